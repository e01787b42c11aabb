use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use clap::Parser;
use log::{debug, info, warn};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tokio::io::AsyncWriteExt;

use arcio::dostime::{timestamp_to_unix_seconds, try_encode_packed};
use arcio::sanitize::sanitize_with;
use arcio::stream::AsyncMaybeSeek;
use arcio::{
    byte_swap32, decode_packed, skip, skip_async, transfer_bounded, transfer_bounded_async,
    unix_seconds_to_timestamp, CancellationToken, MaybeSeek, PackedDateTime,
};

mod cli;
use crate::cli::Cli;
use crate::cli::CliError;
use crate::cli::Commands;
use crate::cli::Config;

fn main() -> Result<(), CliError> {
    env_logger::init();

    // Parse the cli
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    debug!("CONFIG: {:?}", config);

    match cli.command {
        Commands::DecodeTime { date, time } => {
            let ts = decode_packed(date, time);
            println!("{}", ts.format(&Rfc3339)?);
        }
        Commands::EncodeTime { timestamp } => {
            let ts = OffsetDateTime::parse(&timestamp, &Rfc3339)?;
            let packed = PackedDateTime::from_u32(try_encode_packed(ts)?);
            println!(
                "{:#010x} (date {:#06x}, time {:#06x})",
                packed.to_u32(),
                packed.date,
                packed.time
            );
        }
        Commands::UnixTime { seconds } => {
            let ts = unix_seconds_to_timestamp(seconds)?;
            debug!("round trip: {}", timestamp_to_unix_seconds(ts));
            println!("{}", ts.format(&Rfc3339)?);
        }
        Commands::Sanitize { name } => {
            println!("{}", sanitize_with(&name, config.placeholder)?);
        }
        Commands::Swap { value } => {
            println!("{:#010x}", byte_swap32(value));
        }
        Commands::Extract { input, output, offset, length, use_async } => {
            let max_len = length.unwrap_or(u64::MAX);
            let moved = if use_async {
                extract_async(&input, &output, offset, max_len, config.chunk_size)?
            } else {
                extract(&input, &output, offset, max_len, config.chunk_size)?
            };
            info!("copied {} bytes to {:?}", moved, output);
            println!("{}", moved);
        }
    }
    Ok(())
}

fn extract(
    input: &Path,
    output: &Path,
    offset: u64,
    max_len: u64,
    chunk_size: usize,
) -> Result<u64, CliError> {
    let mut source: Box<dyn MaybeSeek> = if input == Path::new("-") {
        Box::new(std::io::stdin())
    } else {
        Box::new(File::open(input)?)
    };
    let mut dest = BufWriter::new(File::create(output)?);

    let skipped = skip(&mut source, offset, chunk_size)?;
    if skipped < offset {
        warn!("input ended after {} of {} skipped bytes", skipped, offset);
    }

    let moved = transfer_bounded(&mut source, &mut dest, max_len, chunk_size)?;
    dest.flush()?;
    Ok(moved)
}

fn extract_async(
    input: &Path,
    output: &Path,
    offset: u64,
    max_len: u64,
    chunk_size: usize,
) -> Result<u64, CliError> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    rt.block_on(async {
        let cancel = CancellationToken::new();
        let on_signal = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("interrupted, stopping copy");
                on_signal.cancel();
            }
        });

        let mut source: Box<dyn AsyncMaybeSeek> = if input == Path::new("-") {
            Box::new(tokio::io::stdin())
        } else {
            Box::new(tokio::fs::File::open(input).await?)
        };
        let mut dest = tokio::io::BufWriter::new(tokio::fs::File::create(output).await?);

        let skipped = skip_async(&mut source, offset, chunk_size, &cancel).await?;
        if skipped < offset {
            warn!("input ended after {} of {} skipped bytes", skipped, offset);
        }

        let res =
            transfer_bounded_async(&mut source, &mut dest, max_len, chunk_size, &cancel).await;
        // Whatever made it across before a cancel still lands on disk
        dest.flush().await?;
        Ok::<u64, CliError>(res?)
    })
}
