use std::sync::Arc;

use anyhow::Result;

use group_dispatch::channel::ChannelRegistry;
use group_dispatch::config::Settings;
use group_dispatch::dispatcher::Dispatcher;
use group_dispatch::metrics::encode_metrics;
use group_dispatch::pipeline::ValidationChain;
use group_dispatch::recipient::ChatUser;
use group_dispatch::telemetry::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let settings = Settings::new()?;

    // Initialize tracing
    init_tracing(&settings.logging)?;
    tracing::info!("Configuration loaded");

    let registry = Arc::new(ChannelRegistry::with_policy(settings.channels.membership));
    let chain = Arc::new(ValidationChain::from_settings(&settings.pipeline)?);
    tracing::info!(stages = ?chain.stage_names(), "Validation chain built");

    let dispatcher = Dispatcher::new(registry.clone(), chain);

    let jim = Arc::new(ChatUser::new("Jim"));
    let barb = Arc::new(ChatUser::new("Barb"));
    let hannah = Arc::new(ChatUser::new("Hannah"));

    let garden = registry.create("Gardening group")?;
    let dogs = registry.create("Dog lovers group")?;

    garden.join(jim.clone());
    garden.join(barb.clone());
    dogs.join(barb.clone());
    dogs.join(hannah.clone());

    let sends = [
        ("Sending empty message", "Gardening group", ""),
        ("Sending short message", "Gardening group", "H"),
        ("Sending message to group 1", "Gardening group", "Hello everyone in group 1!"),
        ("Sending message to group 2", "Dog lovers group", "Hello everyone in group 2!"),
        ("Sending message to a missing group", "Chess club", "Anyone up for a game?"),
    ];

    for (label, channel, payload) in sends {
        match dispatcher.submit(channel, payload) {
            Ok(outcome) => println!("{}:\n{}\n", label, outcome),
            Err(e) => println!("{}:\n[{}] {}\n", label, e.code(), e),
        }
    }

    let report = dogs.broadcast_parallel("Walk at noon!").await;
    tracing::info!(
        channel = %report.channel,
        notified = report.notified,
        latency_us = report.latency_us,
        "Announcement delivered"
    );

    for user in [&jim, &barb, &hannah] {
        for received in user.inbox() {
            println!("{}", received.line());
        }
    }

    println!("{}", serde_json::to_string_pretty(&dispatcher.stats())?);
    println!("{}", serde_json::to_string_pretty(&registry.stats())?);
    print!("{}", encode_metrics()?);

    tracing::info!("Dispatch demo complete");
    Ok(())
}
