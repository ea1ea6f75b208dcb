//! Client network layer: one TCP connection relayed to the terminal.

use crate::input::{from_wire_line, to_wire_line};
use log::{debug, info};
use std::io;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

/// Connects to `server` and relays until either side closes.
pub async fn run(server: &str) -> io::Result<()> {
    let stream = TcpStream::connect(server).await?;
    info!("Connected to {}", server);

    let (read_half, write_half) = stream.into_split();
    let mut printer = tokio::spawn(relay_server_lines(read_half, tokio::io::stdout()));
    let stdin = BufReader::new(tokio::io::stdin());

    tokio::select! {
        result = &mut printer => {
            let lines = result.map_err(|e| io::Error::new(io::ErrorKind::Other, e))??;
            info!("Server closed the connection after {} lines", lines);
        }
        result = relay_input(stdin, write_half) => {
            let lines = result?;
            info!("Input closed after {} lines", lines);
            printer.abort();
        }
    }

    Ok(())
}

/// Copies every server line to `out` with a local newline.
///
/// Returns the number of lines relayed once the server closes.
pub async fn relay_server_lines<R, W>(reader: R, mut out: W) -> io::Result<usize>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = BufReader::new(reader).lines();
    let mut count = 0;

    while let Some(line) = lines.next_line().await? {
        out.write_all(from_wire_line(&line).as_bytes()).await?;
        out.write_all(b"\n").await?;
        out.flush().await?;
        count += 1;
    }

    Ok(count)
}

/// Sends every line of `input` to the server as a protocol line, then
/// shuts down the write side.
pub async fn relay_input<R, W>(input: R, mut server: W) -> io::Result<usize>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    let mut count = 0;

    while let Some(line) = lines.next_line().await? {
        debug!("Sending {:?}", line);
        server.write_all(to_wire_line(&line).as_bytes()).await?;
        count += 1;
    }

    server.shutdown().await?;
    Ok(count)
}
