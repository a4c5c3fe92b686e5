//! `avrcp-dump`: decodes browsing-channel responses read from stdin.
//!
//! Input is a raw byte stream of browse frames. Each frame is parsed as a
//! response and logged; frames that fail to parse are logged and skipped.
//! An optional first argument names a TOML configuration file.

use futures::StreamExt;
use tokio_util::codec::FramedRead;
use tracing::{error, info, warn};

use avrcp_codec::config::CodecConfig;
use avrcp_codec::core::arena::ScratchArena;
use avrcp_codec::core::catalog::OpcodeClass;
use avrcp_codec::core::codec::BrowseFrameCodec;
use avrcp_codec::core::envelope::IncomingMessage;
use avrcp_codec::protocol::dispatcher::Dispatcher;
use avrcp_codec::utils::logging::init_from_config;

#[tokio::main]
async fn main() {
    let config = match std::env::args().nth(1) {
        Some(path) => CodecConfig::from_file(path),
        None => CodecConfig::from_env(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("avrcp-dump: {e}");
            std::process::exit(2);
        }
    };
    init_from_config(&config.logging);

    let dispatcher = Dispatcher::from_config(&config);
    let mut scratch = vec![0u8; dispatcher.scratch_capacity(OpcodeClass::Browse)];
    let mut frames = FramedRead::new(tokio::io::stdin(), BrowseFrameCodec::new(&config.buffers));
    let mut count = 0usize;

    while let Some(frame) = frames.next().await {
        let frame = match frame {
            Ok(frame) => frame,
            Err(e) => {
                error!(error = %e, "Stream error, stopping");
                break;
            }
        };
        count += 1;

        let mut arena = ScratchArena::new(&mut scratch);
        let msg = IncomingMessage::browse(&frame);
        match dispatcher.parse_response(&msg, &mut arena) {
            Ok(parsed) => match &parsed.error {
                None => info!(frame = count, response = ?parsed.value, "Response"),
                Some(e) => warn!(frame = count, response = ?parsed.value, error = %e, "Partial response"),
            },
            Err(e) => warn!(frame = count, len = frame.len(), error = %e, "Undecodable frame"),
        }
    }

    info!(frames = count, "Done");
}
