use remoting_frame::{TlvCodec, DEFAULT_MAX_FRAME_LEN};
use remoting_session::DEFAULT_QUEUE_CAPACITY;
use remoting_transport::DEFAULT_KEEPALIVE;

use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("remoting {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: remoting");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!("codec: tlv (header {} bytes, CR LF)", TlvCodec::HEADER_LEN);
    println!("queue_capacity: {DEFAULT_QUEUE_CAPACITY}");
    println!("max_frame_len: {DEFAULT_MAX_FRAME_LEN}");
    println!("keepalive: {DEFAULT_KEEPALIVE:?}");

    Ok(SUCCESS)
}
