use rust_i18n::t;

use equilibrium_admin::config::Config;
use equilibrium_admin::error::{AdminErrorTrait, Result};
use equilibrium_admin::gateway::HttpGateway;
use equilibrium_admin::structure::load_structure;
use equilibrium_admin::Ident;

/// Fetch the structure and print it level by level
pub async fn structure(config: &Config, json: bool) -> Result<()> {
    let gateway = HttpGateway::new(config.client_config())?;
    let tree = load_structure(&gateway, &config.materialize_options()).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&tree)?);
        return Ok(());
    }

    println!(
        "{} ({} / {})",
        t!("structure.title"),
        tree.reachable_count(),
        tree.input_count()
    );

    if let Some(banner) = tree.banner() {
        println!("! {banner}");
    }
    for issue in tree.issues() {
        println!("  - {}", issue.localized_desc());
    }

    for level in tree.levels() {
        println!();
        println!("{}", t!("structure.level", depth = level.depth));
        for node in &level.nodes {
            let tariff = node.tariff.as_ref().map_or("-", Ident::as_str);
            println!(
                "  {:<24} tariff: {:<16} direct: {:>4} total: {:>6}",
                node.label(),
                tariff,
                node.direct,
                node.total
            );
        }
    }

    Ok(())
}
