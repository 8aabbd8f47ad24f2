#[tokio::main]
async fn main() -> anyhow::Result<()> {
    meal_search::run().await
}
