use aws_config::BehaviorVersion;
use aws_sdk_lambda::Client;
use clap::Parser;
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tokio::task::JoinSet;

const NAMES: &[&str] = &[
    "Isla", "Olivia", "Emily", "Freya", "Ava", "Jack", "Oliver", "Noah", "Leo", "Harris",
    "Jordan", "Alex", "Charlie", "Nobody",
];

const GENDERS: &[&str] = &["B", "G", "E"];

#[derive(Default)]
struct Stats {
    success_count: usize,
    error_count: usize,
    total_latency_ms: f64,
}

#[derive(Deserialize)]
struct HttpResponse {
    #[serde(rename = "statusCode")]
    status_code: u16,
    #[serde(default)]
    body: Option<String>,
}

#[derive(Parser, Debug)]
#[command(name = "invoke-test")]
#[command(about = "Invoke the baby names function with random name lookups")]
struct Args {
    /// Lambda function name
    function: String,

    /// Number of iterations to run
    #[arg(long, default_value = "1000")]
    iters: usize,

    /// Number of parallel threads
    #[arg(long, default_value = "1")]
    threads: usize,

    /// Share of requests (0.0 to 1.0) that ask for a random name
    #[arg(long, default_value = "0.2")]
    random_share: f64,
}

/// HTTP API (payload 2.0) event for `GET /{name}/{gender}`.
fn name_event(name: &str, gender: &str) -> serde_json::Value {
    let path = format!("/{name}/{gender}");
    serde_json::json!({
        "version": "2.0",
        "routeKey": "GET /{name}/{gender}",
        "rawPath": path,
        "rawQueryString": "",
        "headers": {"accept": "text/html"},
        "requestContext": {
            "routeKey": "GET /{name}/{gender}",
            "stage": "$default",
            "http": {
                "method": "GET",
                "path": path,
                "protocol": "HTTP/1.1",
                "sourceIp": "127.0.0.1",
                "userAgent": "invoke-test"
            }
        },
        "pathParameters": {"name": name, "gender": gender},
        "isBase64Encoded": false
    })
}

async fn run_invocations(
    client: Arc<Client>,
    function_name: String,
    thread_id: usize,
    start: usize,
    end: usize,
    total: usize,
    random_share: f64,
    stats: Arc<Mutex<Stats>>,
) {
    let mut rng = StdRng::from_entropy();

    for i in start..=end {
        let name = if rng.gen_bool(random_share) {
            "Random"
        } else {
            NAMES.choose(&mut rng).copied().unwrap_or("Isla")
        };
        let gender = GENDERS.choose(&mut rng).copied().unwrap_or("E");

        let payload = match serde_json::to_vec(&name_event(name, gender)) {
            Ok(payload) => payload,
            Err(e) => {
                eprintln!("[Thread {}: {}/{}] Cannot encode event: {}", thread_id, i, total, e);
                stats.lock().await.error_count += 1;
                continue;
            }
        };

        let started = Instant::now();
        let result = client
            .invoke()
            .function_name(&function_name)
            .payload(aws_sdk_lambda::primitives::Blob::new(payload))
            .send()
            .await;
        let latency_ms = started.elapsed().as_secs_f64() * 1000.0;

        match result {
            Ok(response) => {
                let response_payload = response
                    .payload()
                    .map(|b| String::from_utf8_lossy(b.as_ref()).to_string())
                    .unwrap_or_else(|| "No response".to_string());

                // Function errors come back as {errorType, errorMessage}, not as an HTTP response
                let outcome = match serde_json::from_str::<HttpResponse>(&response_payload) {
                    Ok(http) if http.status_code == 200 => {
                        let size = http.body.map(|b| b.len()).unwrap_or(0);
                        Ok(format!("200, {} bytes", size))
                    }
                    Ok(http) => Err(format!("status {}", http.status_code)),
                    Err(_) => Err(response_payload),
                };

                {
                    let mut stats = stats.lock().await;
                    if outcome.is_ok() {
                        stats.success_count += 1;
                        stats.total_latency_ms += latency_ms;
                    } else {
                        stats.error_count += 1;
                    }
                }

                match outcome {
                    Ok(summary) => println!(
                        "[Thread {}: {}/{}] /{}/{} => {} in {:.3}ms",
                        thread_id, i, total, name, gender, summary, latency_ms
                    ),
                    Err(error) => eprintln!(
                        "[Thread {}: {}/{}] /{}/{} failed: {}",
                        thread_id, i, total, name, gender, error
                    ),
                }
            }
            Err(e) => {
                {
                    let mut stats = stats.lock().await;
                    stats.error_count += 1;
                }

                eprintln!(
                    "[Thread {}: {}/{}] Error invoking /{}/{}: {}",
                    thread_id, i, total, name, gender, e
                );
            }
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if !(0.0..=1.0).contains(&args.random_share) {
        eprintln!("--random-share must be between 0.0 and 1.0");
        std::process::exit(2);
    }
    let threads = args.threads.max(1);

    println!(
        "Running {} invocations across {} thread(s)",
        args.iters, threads
    );

    // Create AWS Lambda client
    let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let client = Arc::new(Client::new(&config));

    let stats = Arc::new(Mutex::new(Stats::default()));

    // Calculate iterations per thread
    let iters_per_thread = args.iters / threads;
    let remainder = args.iters % threads;

    let mut tasks = JoinSet::new();

    let total_iters = args.iters;
    let random_share = args.random_share;

    let mut start = 1;
    for t in 1..=threads {
        let end = if t == threads {
            start + iters_per_thread - 1 + remainder
        } else {
            start + iters_per_thread - 1
        };

        let client = Arc::clone(&client);
        let function_name = args.function.clone();
        let stats = Arc::clone(&stats);

        tasks.spawn(async move {
            run_invocations(
                client,
                function_name,
                t,
                start,
                end,
                total_iters,
                random_share,
                stats,
            )
            .await;
        });

        start = end + 1;
    }

    while let Some(result) = tasks.join_next().await {
        if let Err(e) = result {
            eprintln!("Task failed: {}", e);
        }
    }

    let stats = stats.lock().await;
    println!("Completed {} invocations", args.iters);
    println!();
    println!("Results:");
    println!("  Success: {}", stats.success_count);
    println!("  Errors:  {}", stats.error_count);
    if stats.success_count > 0 {
        let avg_latency = stats.total_latency_ms / stats.success_count as f64;
        println!("  Avg latency: {:.3}ms", avg_latency);
    }
}
