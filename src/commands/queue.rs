use rust_i18n::t;

use equilibrium_admin::config::Config;
use equilibrium_admin::error::Result;
use equilibrium_admin::gateway::HttpGateway;
use equilibrium_admin::queue::{CompletionOutcome, QueueCoordinator, QueueState};

fn coordinator(config: &Config) -> Result<QueueCoordinator<HttpGateway>> {
    let gateway = HttpGateway::new(config.client_config())?;
    Ok(QueueCoordinator::new(gateway, config.queue.flight_policy))
}

fn print_queue(state: &QueueState) {
    println!("{}", t!("queue.title"));

    if let Some(err) = &state.last_error {
        println!("! {}", err.banner());
    }
    if state.snapshot.is_empty() {
        println!("  {}", t!("queue.empty"));
        return;
    }

    for (entry, busy) in state.rows() {
        let marker = if busy { "..." } else { "$" };
        println!(
            "  [{marker}] #{:<6} user {:<8} {:<24} {}: {:<10} {}: {} ({})",
            entry.id,
            entry.user,
            entry.label(),
            t!("queue.inviter"),
            entry.inviter.as_deref().unwrap_or("-"),
            t!("queue.tariff"),
            entry.tariff.name,
            entry.amount
        );
    }
}

/// List pending registrations
pub async fn queue(config: &Config) -> Result<()> {
    let coordinator = coordinator(config)?;
    let result = coordinator.refresh().await;

    print_queue(&coordinator.state());
    result?;
    Ok(())
}

/// Complete one registration and show the refreshed queue
pub async fn complete(config: &Config, user_id: u64) -> Result<()> {
    let coordinator = coordinator(config)?;

    match coordinator.complete(user_id).await? {
        CompletionOutcome::Completed { receipt, refreshed } => {
            println!("{}", t!("queue.completed"));
            if let Some(parent) = &receipt.placement_parent {
                println!("  placement parent: {parent}");
            }
            if let Some(level) = receipt.level {
                println!("  level: {level}");
            }
            if !refreshed {
                tracing::warn!("Queue could not be refreshed after completion");
            }
        }
        CompletionOutcome::Rejected => println!("{}", t!("queue.rejected")),
    }

    print_queue(&coordinator.state());
    Ok(())
}
