use clap::Parser;
use dotenvy::dotenv;
use rocket::{error, info};

use kedikian_mock_auth::UserDirectory;

pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

#[derive(Parser)]
#[command(name = "kedikian-mock-auth")]
#[command(about = "Mock login server for Kedikian frontend development")]
#[command(version)]
struct Cli {
    /// Show extended version information
    #[arg(long, action = clap::ArgAction::SetTrue)]
    version_info: bool,

    /// Port to listen on (default 8000, or ROCKET_PORT)
    #[arg(long)]
    port: Option<u16>,
}

#[rocket::main]
async fn main() {
    let cli = Cli::parse();

    if cli.version_info {
        println!("kedikian-mock-auth {}", built_info::PKG_VERSION);
        println!("Built: {}", built_info::BUILT_TIME_UTC);
        if let Some(commit) = built_info::GIT_COMMIT_HASH {
            println!("Git commit: {}", commit);
        }
        return;
    }

    dotenv().ok();

    let figment = kedikian_mock_auth::figment(cli.port);
    match figment.extract_inner::<u16>("port") {
        Ok(port) => info!("Kedikian mock auth v{} starting on port {}", built_info::PKG_VERSION, port),
        Err(e) => {
            eprintln!("Invalid server configuration: {}", e);
            std::process::exit(2);
        }
    }

    if let Err(e) = kedikian_mock_auth::rocket(figment, UserDirectory::default())
        .launch()
        .await
    {
        error!("Mock auth server failed to launch: {}", e);
        std::process::exit(1);
    }
}
