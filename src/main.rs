use actix_web::{App, HttpServer, middleware::Logger, web};
use chrono::Local; // timestamp in log lines
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter
use std::sync::Arc;

use ruleta_backend::{
    config::Config,
    external::{InMemoryLedger, SystemClock, ThreadRngSource},
    handlers,
    middlewares::create_cors,
    services::*,
    store::RouletteStore,
    swagger::swagger_config,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    // 加载配置
    let config = Config::from_toml().expect("Failed to load configuration file");

    // 注入式协作方: 时钟 / 随机源 / 余额账本
    let clock = Arc::new(SystemClock);
    let random = Arc::new(ThreadRngSource);
    let ledger = Arc::new(InMemoryLedger::new());

    // 创建存储与服务
    let store = RouletteStore::new();
    let catalog_service = PrizeCatalogService::new(
        store.clone(),
        clock.clone(),
        config.roulette.auto_normalize,
    );
    let adjuster = ProbabilityAdjuster::new(store.clone(), clock.clone());
    let spin_service = SpinService::new(
        store.clone(),
        clock.clone(),
        random.clone(),
        ledger.clone(),
    );
    let validation_service =
        ValidationService::new(store.clone(), clock.clone(), ledger.clone());
    let promo_code_service = PromoCodeService::new(store.clone(), clock.clone());

    // 启动后台定时任务: 打印待审核队列深度与最旧等待天数
    {
        let validation_service_clone = validation_service.clone();
        let interval_secs = config.roulette.queue_report_interval_secs.max(1);
        tokio::spawn(async move {
            loop {
                let (depth, oldest_days) = validation_service_clone.queue_depth().await;
                log::info!(
                    "Validation queue: depth={depth} oldest_waiting_days={oldest_days}"
                );
                tokio::time::sleep(std::time::Duration::from_secs(interval_secs)).await;
            }
        });
    }

    // 启动HTTP服务器
    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(create_cors())
            .app_data(web::Data::new(catalog_service.clone()))
            .app_data(web::Data::new(adjuster.clone()))
            .app_data(web::Data::new(spin_service.clone()))
            .app_data(web::Data::new(validation_service.clone()))
            .app_data(web::Data::new(promo_code_service.clone()))
            .configure(swagger_config)
            .service(
                web::scope("/api/v1")
                    .configure(handlers::roulette_config)
                    .configure(handlers::promo_code_config)
                    .configure(handlers::prize_config)
                    .configure(handlers::validation_config),
            )
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
