use std::{
    io::{BufRead, BufReader, Write},
    net::TcpListener,
    thread,
};

use line_client::{ClientConfig, Error, LineClient};
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<(), Error> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(env_filter).init();

    // peer answers HELLO with WORLD, anything else with an error line
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    let peer = thread::spawn(move || -> std::io::Result<()> {
        let (mut stream, addr) = listener.accept()?;
        tracing::info!(%addr, "peer accepted connection");
        let mut reader = BufReader::new(stream.try_clone()?);
        let mut line = String::new();
        while reader.read_line(&mut line)? > 0 {
            let reply: &[u8] = match line.as_str() {
                "HELLO\r\n" => b"WORLD\r\n",
                _ => b"-ERR unknown\r\n",
            };
            stream.write_all(reply)?;
            line.clear();
        }
        Ok(())
    });

    let mut client = LineClient::connect(&ClientConfig::new(addr.to_string()))?;
    client.write("HELLO\r\n")?;
    println!("reply to HELLO: {:?}", client.read_line()?);
    client.write("PING\r\n")?;
    println!("reply to PING: {:?}", client.read_line()?);
    client.close()?;

    join_peer(peer)
}

fn join_peer(peer: thread::JoinHandle<std::io::Result<()>>) -> Result<(), Error> {
    match peer.join() {
        Ok(result) => Ok(result?),
        Err(_) => {
            tracing::error!("peer thread panicked");
            Err(std::io::Error::other("peer thread panicked").into())
        }
    }
}
