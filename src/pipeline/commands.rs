use shell_words::quote;

use super::types::{ENGINE_DATA_SUBDIR, LaunchContext};

/// A published port: `-p host:container`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortMapping {
    pub host: u16,
    pub container: u16,
}

impl PortMapping {
    const fn new(host: u16, container: u16) -> Self {
        Self { host, container }
    }
}

/// Dgraph zero's internal gRPC port.
pub const PEER_PORT: PortMapping = PortMapping::new(8995, 5080);
/// Dgraph zero's HTTP coordination port.
pub const ZERO_PORT: PortMapping = PortMapping::new(8996, 6080);
/// Container side of the client/query port; the host side follows the
/// configured connection port.
pub const QUERY_CONTAINER_PORT: u16 = 8080;
/// Dgraph alpha's internal gRPC port.
pub const ALPHA_PORT: PortMapping = PortMapping::new(8998, 9080);
/// Ratel admin UI.
pub const ADMIN_UI_PORT: PortMapping = PortMapping::new(8999, 8000);

/// The five port mappings of a new container, in publishing order.
pub fn port_mappings(query_port: u16) -> [PortMapping; 5] {
    [
        PEER_PORT,
        ZERO_PORT,
        PortMapping::new(query_port, QUERY_CONTAINER_PORT),
        ALPHA_PORT,
        ADMIN_UI_PORT,
    ]
}

/// `<runtime> container start <id>`
pub fn start_command(ctx: &LaunchContext, id: &str) -> String {
    format!("{} container start {}", quote(&ctx.runtime), quote(id))
}

/// `<runtime> run -d -p ... --label <label> -v <data>:/<engine> --name <name> <image>:<version>`
pub fn create_command(ctx: &LaunchContext) -> String {
    let ports = port_mappings(ctx.connection.port)
        .iter()
        .map(|p| format!("-p {}:{}", p.host, p.container))
        .collect::<Vec<_>>()
        .join(" ");
    let volume = format!("{}:/{ENGINE_DATA_SUBDIR}", ctx.data_dir().display());

    format!(
        "{} run -d {ports} --label {} -v {} --name {} {}",
        quote(&ctx.runtime),
        quote(&ctx.label),
        quote(&volume),
        quote(&ctx.container_name),
        quote(&ctx.image_ref()),
    )
}
