#[actix_web::main]
async fn main() -> std::io::Result<()> {
    ithraa_contract_server::run().await
}
