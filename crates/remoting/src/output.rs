use std::io::{IsTerminal, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use remoting_frame::Packet;
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct PacketOutput<'a> {
    remote: &'a str,
    opaque: u32,
    cmd_type: u8,
    data_size: usize,
    data: String,
    timestamp: u64,
}

impl<'a> PacketOutput<'a> {
    fn new(packet: &Packet, remote: &'a str) -> Self {
        Self {
            remote,
            opaque: packet.opaque,
            cmd_type: packet.cmd_type,
            data_size: packet.data.len(),
            data: data_preview(&packet.data),
            timestamp: now_unix_seconds(),
        }
    }
}

pub fn print_packet(packet: &Packet, remote: &str, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = PacketOutput::new(packet, remote);
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["OPAQUE", "CMD", "SIZE", "REMOTE", "DATA"])
                .add_row(vec![
                    packet.opaque.to_string(),
                    packet.cmd_type.to_string(),
                    packet.data.len().to_string(),
                    remote.to_string(),
                    data_preview(&packet.data),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!("{}", pretty_line(packet, remote));
        }
        OutputFormat::Raw => {
            let mut out = std::io::stdout();
            let _ = out.write_all(&packet.data);
            let _ = out.flush();
        }
    }
}

fn pretty_line(packet: &Packet, remote: &str) -> String {
    format!(
        "opaque={} cmd={} size={} remote={} data={}",
        packet.opaque,
        packet.cmd_type,
        packet.data.len(),
        remote,
        data_preview(&packet.data)
    )
}

fn data_preview(data: &[u8]) -> String {
    match std::str::from_utf8(data) {
        Ok(text) => text.to_string(),
        Err(_) => format!("<binary {} bytes>", data.len()),
    }
}

fn now_unix_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
