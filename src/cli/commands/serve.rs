//! Web server command.

use console::style;

use docsight::config::Settings;

/// Start the web server.
pub async fn cmd_serve(mut settings: Settings, bind: Option<&str>) -> anyhow::Result<()> {
    if let Some(bind) = bind {
        let (host, port) = parse_bind_address(bind, &settings.server.host, settings.server.port);
        settings.server.host = host;
        settings.server.port = port;
    }

    println!(
        "{} Starting docsight server at http://{}",
        style("→").cyan(),
        settings.bind_addr()
    );
    println!(
        "  Rate limit: {} requests per {}s",
        settings.rate_limit.max_requests,
        settings.rate_limit.window().as_secs()
    );
    println!("  Press Ctrl+C to stop");

    docsight::server::serve(&settings).await
}

/// Parse a bind address that can be:
/// - Just a port: "3030" -> default host, port 3030
/// - Just a host: "0.0.0.0" -> 0.0.0.0, default port
/// - Host and port: "0.0.0.0:3030"
fn parse_bind_address(bind: &str, default_host: &str, default_port: u16) -> (String, u16) {
    if let Ok(port) = bind.parse::<u16>() {
        return (default_host.to_string(), port);
    }

    if let Some((host, port_str)) = bind.rsplit_once(':') {
        if let Ok(port) = port_str.parse::<u16>() {
            return (host.to_string(), port);
        }
    }

    (bind.to_string(), default_port)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bind_address() {
        assert_eq!(
            parse_bind_address("8080", "127.0.0.1", 3000),
            ("127.0.0.1".to_string(), 8080)
        );
        assert_eq!(
            parse_bind_address("0.0.0.0", "127.0.0.1", 3000),
            ("0.0.0.0".to_string(), 3000)
        );
        assert_eq!(
            parse_bind_address("0.0.0.0:9000", "127.0.0.1", 3000),
            ("0.0.0.0".to_string(), 9000)
        );
    }
}
