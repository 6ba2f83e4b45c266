use ebs_cleanup::config::Settings;
use ebs_cleanup::handler::handle;
use ebs_cleanup::prelude::*;
use ebs_cleanup::provider::Ec2Api;
use std::process::ExitCode;
use tracing::{info, Level};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();
    info!("Starting EBS volume cleanup");

    let settings = Settings::new()?;
    info!("Minimum volume age: {}", settings.ebs_minimum_age);

    let api = Ec2Api::from_env().await;
    let event = serde_json::json!({});
    let response = handle(&event, &api, &settings.ebs_minimum_age).await?;

    println!("{}", serde_json::to_string(&response)?);

    Ok(if response.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
