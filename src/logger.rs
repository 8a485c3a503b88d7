use anyhow::Result;
use chrono::Local;
use env_logger::fmt::Color;
use indicatif::MultiProgress;
use indicatif_log_bridge::LogWrapper;
use log::Level;
use std::io::Write;

// 全局MultiProgress实例，进度条和日志共用
lazy_static::lazy_static! {
    pub static ref MULTI_PROGRESS: MultiProgress = MultiProgress::new();
}

pub fn init_logger() -> Result<()> {
    // 默认INFO级别，可以通过RUST_LOG覆盖
    let logger = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let mut style = buf.style();
            let level_color = match record.level() {
                Level::Error => Color::Red,
                Level::Warn => Color::Yellow,
                Level::Info => Color::Green,
                Level::Debug => Color::Blue,
                Level::Trace => Color::Cyan,
            };
            style.set_color(level_color);

            let timestamp = Local::now().format("%H:%M:%S%.3f");
            let level_str = style.value(format!("{:<5}", record.level()));

            writeln!(buf, "[{} {} {}] {}", timestamp, level_str, record.target(), record.args())
        })
        .target(env_logger::Target::Stdout)
        .build();

    // 日志不写文件，否则日志文件本身会被扫描并上传
    let level = logger.filter();
    LogWrapper::new(MULTI_PROGRESS.clone(), logger).try_init()?;
    log::set_max_level(level);

    Ok(())
}
