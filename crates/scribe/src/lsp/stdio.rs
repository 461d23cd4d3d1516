use crate::prelude::{eprintln, *};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

use super::cli::StdioOptions;
use super::ServerState;
use crate::backend::BackendOptions;
use crate::resolver;

pub async fn run_stdio(options: StdioOptions, global: crate::Global) -> Result<()> {
    if global.verbose {
        eprintln!("Starting language server on stdio...");
        eprintln!();
    }

    let (outbound_tx, mut outbound_rx) = mpsc::channel::<String>(64);

    // Single writer task: spawned request handlers finish in any order and
    // funnel their responses through the channel.
    let writer = tokio::spawn(async move {
        let mut stdout = tokio::io::stdout();
        while let Some(body) = outbound_rx.recv().await {
            if write_frame(&mut stdout, &body).await.is_err() {
                break;
            }
        }
    });

    let state = Arc::new(ServerState::new(
        resolver::rewrite_defaults(options.model, options.temperature),
        BackendOptions {
            ollama_url: options.ollama_url,
        },
        outbound_tx,
    ));

    let stdin = tokio::io::stdin();
    let mut reader = BufReader::new(stdin);

    loop {
        let Some(body) = read_frame(&mut reader).await? else {
            break; // EOF
        };

        if global.verbose {
            eprintln!("Received: {body}");
        }

        if !super::process_message(&state, &body).await {
            break; // exit notification
        }
    }

    // The writer drains once every handler task has dropped its sender.
    drop(state);
    writer.await?;

    Ok(())
}

/// Read one Content-Length framed message. Returns `None` on a clean EOF
/// between messages.
async fn read_frame<R>(reader: &mut R) -> Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    let mut content_length: Option<usize> = None;
    let mut header = String::new();

    loop {
        header.clear();
        let bytes_read = reader.read_line(&mut header).await?;
        if bytes_read == 0 {
            return Ok(None);
        }

        let line = header.trim_end_matches(['\r', '\n']);
        if line.is_empty() {
            break;
        }

        if let Some(rest) = line.strip_prefix("Content-Length:") {
            let value = rest.trim();
            content_length = Some(
                value
                    .parse::<usize>()
                    .map_err(|_| eyre!("Invalid Content-Length: {value}"))?,
            );
        }
        // Other headers (Content-Type) carry nothing we need.
    }

    let content_length = content_length.ok_or_eyre("Missing Content-Length header")?;

    let mut body = vec![0u8; content_length];
    reader.read_exact(&mut body).await?;

    Ok(Some(String::from_utf8(body)?))
}

async fn write_frame<W>(writer: &mut W, body: &str) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    writer
        .write_all(format!("Content-Length: {}\r\n\r\n", body.len()).as_bytes())
        .await?;
    writer.write_all(body.as_bytes()).await?;
    writer.flush().await
}
