use longevity_protocol_api::run;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("longevity protocol error: {err}");
        std::process::exit(1);
    }
}
