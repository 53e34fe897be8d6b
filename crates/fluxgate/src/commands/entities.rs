//! Entity listing command handlers.

use tabled::Tabled;

use fluxgate_api::PanelClient;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct NodeRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "ADDRESS")]
    address: String,
    #[tabled(rename = "STATUS")]
    status: String,
}

#[derive(Tabled)]
struct AdminRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "USERNAME")]
    username: String,
    #[tabled(rename = "SUDO")]
    sudo: String,
}

pub async fn list_nodes(client: &PanelClient, global: &GlobalOpts) -> Result<(), CliError> {
    let nodes = client.list_nodes().await?;

    let out = output::render_list(
        &global.output,
        &nodes,
        |n| NodeRow {
            id: n.id,
            name: n.name.clone(),
            address: n.address.clone().unwrap_or_default(),
            status: n.status.clone().unwrap_or_default(),
        },
        |n| n.id.to_string(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn list_admins(client: &PanelClient, global: &GlobalOpts) -> Result<(), CliError> {
    let admins = client.list_admins().await?;

    let out = output::render_list(
        &global.output,
        &admins,
        |a| AdminRow {
            id: a.id,
            username: a.username.clone(),
            sudo: if a.is_sudo { "yes".into() } else { "no".into() },
        },
        |a| a.id.to_string(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
