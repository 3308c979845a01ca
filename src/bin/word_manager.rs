use clap::{Arg, Command};
use termo_server::word::Word;
use termo_server::word_bank::WordBank;

fn main() {
    let matches = Command::new("单词管理器")
        .version("1.0")
        .about("管理猜词游戏词库")
        .subcommand(Command::new("list").about("列出所有单词"))
        .subcommand(
            Command::new("add").about("添加新单词").arg(
                Arg::new("word")
                    .help("5个字母的单词")
                    .required(true)
                    .index(1),
            ),
        )
        .subcommand(Command::new("stats").about("显示词库统计信息"))
        .subcommand(Command::new("validate").about("验证词库完整性"))
        .subcommand(
            Command::new("export").about("导出词库到文件").arg(
                Arg::new("file")
                    .help("输出文件路径")
                    .required(true)
                    .index(1),
            ),
        )
        .get_matches();

    // 初始化配置
    if let Err(e) = termo_server::config::Config::init() {
        eprintln!("配置初始化失败: {}", e);
        return;
    }

    let mut word_bank = WordBank::new(termo_server::config::Config::get().word_bank.clone());

    match matches.subcommand() {
        Some(("list", _)) => {
            println!("词库共 {} 个单词:", word_bank.lexicon().len());
            for chunk in word_bank.lexicon().chunks(10) {
                let line: Vec<&str> = chunk.iter().map(|w| w.as_str()).collect();
                println!("  {}", line.join(" "));
            }
        }
        Some(("add", args)) => {
            let raw = args.value_of("word").unwrap_or_default();
            let word = match Word::parse(raw) {
                Ok(word) => word,
                Err(e) => {
                    eprintln!("{}", e);
                    return;
                }
            };

            if !word_bank.add_word(word) {
                println!("单词已存在: {}", word);
                return;
            }

            // 保存到文件
            let path = word_bank.get_config().file_path.clone();
            if let Err(e) = word_bank.save_to_file(&path) {
                eprintln!("保存词库失败: {}", e);
            } else {
                println!("成功添加单词: {}", word);
            }
        }
        Some(("stats", _)) => {
            let stats = word_bank.get_stats();
            println!("词库统计信息:");
            println!("  总单词数: {}", stats.total_words);
            println!("  当前词池: {}", stats.pool_size);
            println!("  字母分布:");
            for (i, count) in stats.letter_stats.iter().enumerate() {
                if *count > 0 {
                    println!("    {}: {}", char::from(b'A' + i as u8), count);
                }
            }
        }
        Some(("validate", _)) => {
            let errors = word_bank.validate();
            if errors.is_empty() {
                println!("词库验证通过！");
            } else {
                println!("词库验证发现 {} 个问题:", errors.len());
                for error in errors {
                    println!("  - {}", error);
                }
            }
        }
        Some(("export", args)) => {
            let file_path = args.value_of("file").unwrap_or_default();
            if let Err(e) = word_bank.save_to_file(file_path) {
                eprintln!("导出失败: {}", e);
            } else {
                println!("成功导出词库到: {}", file_path);
            }
        }
        _ => {
            println!("请使用 --help 查看可用命令");
        }
    }
}
