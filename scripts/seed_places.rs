use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;
use wayfind_core::catalog::CatalogStore;
use wayfind_core::config::{self, load_env};
use wayfind_core::embedder::TextEmbedder;
use wayfind_core::types::NewPlace;
use wayfind_provider_embedding::LocalEmbedder;
use wayfind_storage_sql::PostgresAdapter;

/// Demo catalog: name, city, category, description, search context.
/// Multilingual on purpose; the embedding model is multilingual.
const DEMO_PLACES: &[(&str, &str, &str, &str, &str)] = &[
    // --- Moscow ---
    (
        "Красная Площадь",
        "Moscow",
        "Landmark",
        "Сердце России, исторический центр Москвы с видом на Кремль и Собор Василия Блаженного.",
        "Красная Площадь. Главная достопримечательность, история, прогулки, брусчатка, мавзолей Ленина, ГУМ, мороженое, сувениры, зима, каток, ярмарка, центр города. Рядом рестораны и кафе.",
    ),
    (
        "Парк Горького",
        "Moscow",
        "Park",
        "Главный парк столицы. Идеальное место для отдыха, спорта и пикников на набережной.",
        "Парк Горького. Природа, деревья, набережная Москвы-реки, велосипеды, самокаты, прогулка с детьми, свидание, лето, отдых, пикник, катамараны. Есть еда, бургеры, кофе, уличная еда.",
    ),
    (
        "Депо.Москва",
        "Moscow",
        "Food",
        "Крупнейший фудмолл в Европе. Гастрономический квартал в здании бывшего трамвайного депо.",
        "Депо.Москва. Еда, рестораны, гастромаркет, фастфуд, высокая кухня, бар, коктейли, тусовка, завтрак, обед, ужин, встречи с друзьями, шумное место, много людей, вкусно поесть.",
    ),
    // --- Saint Petersburg ---
    (
        "Эрмитаж",
        "Saint Petersburg",
        "Museum",
        "Один из величайших музеев мира в Зимнем дворце. Миллионы экспонатов искусства.",
        "Эрмитаж. Искусство, картины, история, цари, дворец, культура, дождь (спрятаться от погоды), экскурсия, долго ходить, интересно, образование. Внутри есть кафе.",
    ),
    (
        "Севкабель Порт",
        "Saint Petersburg",
        "Public Space",
        "Модное пространство у моря на Васильевском острове. Вид на залив, выставки и бары.",
        "Севкабель Порт. Море, Финский залив, закат, романтика, современное искусство, выставки, концерты, вечеринки, каток зимой, бары, стритфуд, молодежное место, хипстеры.",
    ),
    (
        "Улица Рубинштейна",
        "Saint Petersburg",
        "Nightlife",
        "Главная ресторанная улица города. Барная линия с десятками заведений на любой вкус.",
        "Улица Рубинштейна. Бары, алкоголь, вечеринка, ночь, рестораны, вкусная еда, знакомства, тусовка, прогулка, выпить, коктейли, музыка, центр.",
    ),
    // --- Omsk ---
    (
        "Skuratov Coffee (Флагман)",
        "Omsk",
        "Cafe",
        "Родина знаменитых брю-баров. Стильный интерьер, отличный кофе и атмосфера для работы.",
        "Skuratov Coffee (Флагман). Кофе, кофейня, завтрак, работа с ноутбуком, фриланс, спокойное место, вкусный десерт, круассаны, эйр латте, колд брю, встреча, уют.",
    ),
    (
        "Омская Крепость",
        "Omsk",
        "Landmark",
        "Исторический комплекс на берегу Иртыша. Восстановленные ворота и здания 18-19 веков.",
        "Омская Крепость. История, достопримечательность, Иртыш, река, набережная, прогулки, экскурсии, Тобольские ворота, памятник, культура, центр города, фотосессия.",
    ),
    (
        "Птичья Гавань",
        "Omsk",
        "Nature",
        "Природный парк в черте города. Озера, перелетные птицы и тишина.",
        "Птичья Гавань. Природа, экология, парк, птицы, животные, тишина, спокойствие, прогулка с детьми, свежий воздух, озеро, осень, лето, наблюдение.",
    ),
];

#[derive(Parser, Debug)]
#[command(name = "seed-places", about = "Reset and seed the Wayfind places catalog")]
struct Cli {
    #[arg(long, env = "WAYFIND_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> wayfind_core::Result<()> {
    load_env()?;
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .init();

    let database_url = config::get_required_env("DATABASE_URL")?;
    let adapter = Arc::new(PostgresAdapter::new(&database_url).await?);
    adapter.initialize().await?;

    let embedder = LocalEmbedder::new(
        &config::get_env_or(
            "WAYFIND_EMBEDDING_MODEL",
            "paraphrase-multilingual-mpnet-base-v2",
        ),
        config::get_env_int("WAYFIND_EMBEDDING_WORKERS", config::DEFAULT_EMBEDDING_WORKERS),
        Duration::from_secs(config::get_env_int(
            "WAYFIND_EMBEDDING_TIMEOUT_SECS",
            config::DEFAULT_EMBEDDING_TIMEOUT_SECS,
        )),
    )?;

    info!("Resetting places catalog...");
    sqlx::query("TRUNCATE TABLE places RESTART IDENTITY CASCADE")
        .execute(adapter.pool())
        .await?;

    for (name, city, kind, description, search_context) in DEMO_PLACES {
        info!("Seeding: {}...", name);
        let embedding = embedder.embed(search_context).await?;
        adapter
            .create_place(NewPlace {
                name: (*name).to_string(),
                city: (*city).to_string(),
                kind: (*kind).to_string(),
                price: None,
                description: (*description).to_string(),
                search_context: Some((*search_context).to_string()),
                image_url: None,
                embedding,
            })
            .await?;
    }

    info!("Seeded {} places", DEMO_PLACES.len());
    Ok(())
}
