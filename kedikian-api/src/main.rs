use std::process::ExitCode;

use clap::Parser;
use dotenvy::dotenv;
use rocket::{error, info};

pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

#[derive(Parser)]
#[command(name = "kedikian-api")]
#[command(about = "Kedikian business management API server")]
#[command(version)]
struct Cli {
    /// Show extended version information
    #[arg(long, action = clap::ArgAction::SetTrue)]
    version_info: bool,

    /// SQLite database file. Falls back to DATABASE_URL (also read from .env).
    #[arg(long)]
    database_url: Option<String>,
}

fn build_summary() -> Vec<String> {
    let mut lines = vec![
        format!("kedikian-api {}", built_info::PKG_VERSION),
        format!("Built: {}", built_info::BUILT_TIME_UTC),
    ];
    if let Some(commit) = built_info::GIT_COMMIT_HASH {
        lines.push(format!("Git commit: {}", commit));
    }
    lines
}

#[rocket::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.version_info {
        for line in build_summary() {
            println!("{}", line);
        }
        return ExitCode::SUCCESS;
    }

    dotenv().ok();

    let Some(database_url) = cli.database_url.or_else(|| std::env::var("DATABASE_URL").ok()) else {
        eprintln!("No database configured: pass --database-url or set DATABASE_URL");
        return ExitCode::from(2);
    };

    for line in build_summary() {
        info!("{}", line);
    }

    match kedikian_api::rocket(&database_url).launch().await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Kedikian API failed to launch: {}", e);
            ExitCode::FAILURE
        }
    }
}
