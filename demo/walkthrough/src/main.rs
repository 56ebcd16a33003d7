// Console walkthrough of the full consent pipeline:
// connect -> login -> OTP -> discover -> link -> confirm -> consent -> revoke

use anyhow::{bail, Context, Result};
use consent_core::{ApprovalMode, ErrorDetail, EventListener, TelemetryEvent, TypedIdentifier};
use consent_flow::{ConsentAggregator, DiscoveryCoordinator, LinkingCoordinator, RevocationClient};
use session_gateway::{
    register_event_listener, set_events_enabled, ClientConfig, HttpTransport, LoginFlow,
    LoginProfile, SessionGateway,
};
use std::io::Write;
use std::sync::Arc;
use tracing::info;

struct PrintingListener;

impl EventListener for PrintingListener {
    fn on_event(&self, event: &TelemetryEvent) {
        info!(
            "event {} [{}] {}",
            event.name,
            event.category,
            serde_json::Value::Object(event.params.clone())
        );
    }
}

fn prompt(label: &str) -> Result<String> {
    print!("{label}: ");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn prompt_or(label: &str, default: &str) -> Result<String> {
    let value = prompt(&format!("{label} [{default}]"))?;
    Ok(if value.is_empty() {
        default.to_string()
    } else {
        value
    })
}

fn report(step: &str, detail: ErrorDetail) {
    eprintln!(
        "{step} failed: [{}] {} ({})",
        detail.code, detail.message, detail.localized_description
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    register_event_listener(Arc::new(PrintingListener));
    set_events_enabled(true);

    let config = match std::env::var("AA_CLIENT_CONFIG") {
        Ok(path) => ClientConfig::from_file(&path)
            .with_context(|| format!("loading client config from {path}"))?,
        Err(_) => ClientConfig::default(),
    };
    let profile_path = config
        .profile_path
        .clone()
        .unwrap_or_else(|| "walkthrough-profile.toml".into());
    let saved = match LoginProfile::load(&profile_path) {
        Ok(saved) => saved,
        Err(e) => {
            eprintln!("ignoring unreadable profile {}: {e}", profile_path.display());
            None
        }
    };

    let transport = Arc::new(HttpTransport::new(config)?);
    let mut gateway = SessionGateway::new(transport);
    gateway.connect().await?;

    // Authentication; the saved profile pre-fills the three inputs.
    let username = prompt_or("Username", saved.as_ref().map_or("", |p| p.username.as_str()))?;
    let mobile_number = prompt_or(
        "Mobile number",
        saved.as_ref().map_or("", |p| p.mobile_number.as_str()),
    )?;
    let consent_handle = prompt_or(
        "Consent handle",
        saved.as_ref().map_or("", |p| p.consent_handle.as_str()),
    )?;

    match gateway.login(&username, &mobile_number, &consent_handle).await {
        Ok(LoginFlow::Verified(session)) => {
            println!("silent auth verified session for {}", session.user_id)
        }
        Ok(LoginFlow::OtpRequired { .. }) => {
            let otp = prompt("Enter OTP")?;
            let session = gateway.verify_otp(&otp).await?;
            println!("session verified for {}", session.user_id);
        }
        Err(e) => {
            report("login", e.detail());
            bail!("authentication failed");
        }
    }

    LoginProfile {
        username,
        mobile_number,
        consent_handle: consent_handle.clone(),
    }
    .save(&profile_path)?;

    let gateway = Arc::new(gateway);
    let mut discovery = DiscoveryCoordinator::new(gateway.clone());
    let mut linking = LinkingCoordinator::new(gateway.clone());

    // Dashboard: current linked accounts.
    let linked = linking.fetch_linked_accounts().await?;
    println!("{} linked accounts", linked.len());
    for account in &linked {
        println!(
            "  {} {} ({})",
            account.fip_name, account.masked_account_number, account.account_type
        );
    }

    // Discovery round.
    let fips = discovery.list_fips().await?;
    for fip in &fips {
        println!("  {} - {}", fip.fip_id, fip.product_name.as_deref().unwrap_or("?"));
    }
    let fip_id = prompt("FIP id to discover against")?;
    let overview = discovery.fip_overview(&fip_id).await;
    if let Ok(entity) = &overview.entity {
        println!("entity: {}", entity.entity_name);
    }
    let fip_details = match overview.details {
        Ok(details) => details,
        Err(e) => {
            report("fip_details", e.detail());
            bail!("cannot link without the FIP identifier schema");
        }
    };

    loop {
        let category = prompt("Identifier category (blank to finish)")?;
        if category.is_empty() {
            break;
        }
        let identifier_type = prompt("Identifier type")?;
        let value = prompt("Identifier value")?;
        discovery.add_identifier(TypedIdentifier::new(category, identifier_type, value));
    }

    let fi_types: Vec<String> = fips
        .iter()
        .find(|f| f.fip_id == fip_id)
        .map(|f| f.fip_fi_types.clone())
        .unwrap_or_default();
    let accounts = discovery
        .discover_filtered(&fip_id, &fi_types, linking.linked_references())
        .await?;
    if accounts.is_empty() {
        println!("no new accounts discovered");
    } else {
        for account in &accounts {
            println!("  discovered {}", account.masked_account_number);
        }
        linking.link_accounts(&fip_details, &accounts).await?;
        let otp = prompt("Linking OTP")?;
        let confirmation = linking.confirm_linking(&otp).await?;
        println!("linked {} accounts", confirmation.linked_accounts.len());
    }

    // Consent processing over the full linked set.
    let mut aggregator = ConsentAggregator::new(gateway.clone(), vec![consent_handle]);
    for (handle, error) in aggregator.fetch_details().await {
        report(&format!("consent detail {handle}"), error.detail());
    }
    let selections = linking.fetch_linked_accounts().await?;
    match prompt_or("Approve consent? (split/multiple/deny)", "multiple")?.as_str() {
        "split" => aggregator.approve(ApprovalMode::Split, &selections).await?,
        "deny" => aggregator.deny().await?,
        _ => aggregator.approve(ApprovalMode::Multiple, &selections).await?,
    }
    println!("consent processed");

    let consent_id = prompt("Consent id to revoke (blank to skip)")?;
    if !consent_id.is_empty() {
        match RevocationClient::new(gateway).revoke(&consent_id).await {
            Ok(()) => println!("consent revoked"),
            Err(e) => report("revoke", e.detail()),
        }
    }

    Ok(())
}
