use armada::{
    init_logging, run_client, run_datagram_server, run_stream_server, ConsoleInterface,
    DatagramTransport, Link, StreamTransport, DEFAULT_PORT,
};
use clap::{Parser, ValueEnum};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Clone, Debug)]
enum TransportKind {
    /// Reliable stream transport (TCP).
    Stream,
    /// Unreliable datagram transport (UDP).
    Datagram,
}

#[derive(Parser)]
enum Commands {
    /// Host a match and wait for two participants.
    Serve {
        #[arg(long, value_enum, default_value_t = TransportKind::Stream)]
        transport: TransportKind,
        #[arg(long, default_value_t = format!("0.0.0.0:{}", DEFAULT_PORT))]
        bind: String,
    },
    /// Join a hosted match.
    Join {
        #[arg(long, value_enum, default_value_t = TransportKind::Stream)]
        transport: TransportKind,
        #[arg(long, default_value_t = format!("127.0.0.1:{}", DEFAULT_PORT))]
        connect: String,
        #[arg(long)]
        name: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Serve { transport, bind } => match transport {
            TransportKind::Stream => run_stream_server(&bind).await,
            TransportKind::Datagram => run_datagram_server(&bind).await,
        },
        Commands::Join {
            transport,
            connect,
            name,
        } => {
            let link = match transport {
                TransportKind::Stream => {
                    Link::reliable(Box::new(StreamTransport::connect(&connect).await?))
                }
                TransportKind::Datagram => {
                    Link::acked(Box::new(DatagramTransport::connect(&connect).await?))
                }
            };
            let mut interface = ConsoleInterface;
            run_client(link, &name, &mut interface).await
        }
    }
}
