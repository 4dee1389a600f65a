#[actix_web::main]
async fn main() -> std::io::Result<()> {
    note_maker_server::run().await
}
