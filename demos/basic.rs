use std::time::Duration;

use jules_http::{
    CancellationToken, CreateSessionRequest, JulesClient, PageRequest, SendMessageRequest,
    SourceContext, TimeoutPolicy,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("jules_http=info")),
        )
        .init();

    let client = JulesClient::from_env()?;

    let sources = client.list_sources(None).await?;
    for source in &sources.sources {
        println!("- {}: {}", source.id, source.name);
        if let Some(repo) = &source.github_repo {
            println!("  GitHub: {}/{}", repo.owner, repo.repo);
        }
    }

    let Some(source) = sources.sources.first() else {
        println!("No sources found. Connect a GitHub repository in the Jules web app first.");
        return Ok(());
    };

    let session = client
        .create_session(&CreateSessionRequest::new(
            "Create a simple web app that displays 'Hello from Jules!'",
            SourceContext::new(&source.name).with_starting_branch("main"),
            "Hello World App Session",
        ))
        .await?;
    println!("created session {} ({})", session.id, session.title);

    // Wait for the session to show up, but never longer than two minutes.
    let stop = CancellationToken::new();
    let timer = stop.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(120)).await;
        timer.cancel();
    });
    let patient = client
        .clone()
        .with_timeout(TimeoutPolicy::Unbounded)
        .with_cancellation(stop);

    let activities = patient
        .list_activities(&session.id, &PageRequest::new().with_page_size(10))
        .await?;
    for activity in activities.activities {
        let content = activity.content.unwrap_or_default();
        let preview: String = content.chars().take(100).collect();
        println!("- {}: {preview}", activity.kind);
    }

    client
        .send_message(
            &session.id,
            &SendMessageRequest::new("Please add some styling to make it look more attractive."),
        )
        .await?;
    println!("message sent; the agent will respond in future activities");

    Ok(())
}
