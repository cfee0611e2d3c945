use clap::Parser;
use coronavstech::utils::logger;
use coronavstech::{CompaniesClient, CompanyInput, CoronaError};

#[derive(Parser)]
#[command(name = "companies-client")]
#[command(about = "List or create companies on a running coronavstech server")]
struct Args {
    /// Base URL of the server
    #[arg(short, long, default_value = "http://127.0.0.1:8000")]
    base_url: String,

    /// Create a company with this name before listing
    #[arg(long)]
    create: Option<String>,

    /// Status for the created company (Hiring, Layoffs, Hiring Freeze)
    #[arg(long, requires = "create")]
    status: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    logger::init_cli_logger(args.verbose);

    let client = CompaniesClient::new(&args.base_url)?;

    if let Some(name) = args.create {
        let mut input = CompanyInput::named(name);
        input.status = args.status;

        match client.create(&input).await {
            Ok(company) => println!("✅ Created #{}: {} ({})", company.id, company.name, company.status),
            Err(CoronaError::Validation(errors)) => {
                for (field, messages) in errors.fields() {
                    eprintln!("❌ {}: {}", field, messages.join(" "));
                }
                std::process::exit(2);
            }
            Err(e) => return Err(e.into()),
        }
    }

    let companies = client.list().await?;
    println!("📋 {} companies", companies.len());
    for company in companies {
        println!("  - {:<30} {:<14} {}", company.name, company.status.as_str(), company.application_link);
    }

    Ok(())
}
