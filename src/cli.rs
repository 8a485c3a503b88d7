use clap::Parser;

#[derive(Parser, Debug)]
#[command(version)]
#[command(about = "upload files in current directory to Web Workflow enabled board")]
pub struct Cli {
    /// Board hostname or IP address
    #[arg(allow_hyphen_values = true)]
    pub hostname: String,

    /// Web Workflow password
    #[arg(allow_hyphen_values = true)]
    pub password: String,

    /// Compare modification times to the second instead of rounding down to even seconds
    #[arg(long)]
    pub exact_mtime: bool,
}

/// 去掉参数两端成对的引号
pub fn clean_input(value: &str) -> String {
    let quoted = value.len() >= 2
        && ((value.starts_with('"') && value.ends_with('"'))
            || (value.starts_with('\'') && value.ends_with('\'')));
    if quoted {
        value[1..value.len() - 1].to_string()
    } else {
        value.to_string()
    }
}

pub fn usage(program: &str) -> String {
    format!(
        "{program} - upload files in current directory to Web Workflow enabled board\n\n \
         Usage:\n     {program} [hostname] [password]\n"
    )
}
