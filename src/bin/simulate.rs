use std::io::Write;
use std::time::Instant;

use campaign_sim::constants::{DEFAULT_SEED, DEFAULT_SENSITIVITY};
use campaign_sim::{
    decision_agreement, default_variance, generate_questions, laplace_ppf, summarize_campaign,
    BandRule, ThresholdRule,
};

struct Args {
    impressions: u64,
    rate: f64,
    samples: usize,
    seed: u64,
    epsilon: f64,
    json: bool,
    agreement: bool,
}

fn parse_args() -> Args {
    let argv: Vec<String> = std::env::args().collect();
    let mut args = Args {
        impressions: 1_000_000,
        rate: 0.05,
        samples: 1_000_000,
        seed: DEFAULT_SEED,
        epsilon: 1.0,
        json: false,
        agreement: false,
    };

    let mut i = 1;
    while i < argv.len() {
        match argv[i].as_str() {
            "--impressions" => {
                i += 1;
                if i < argv.len() {
                    args.impressions = argv[i].parse().unwrap_or_else(|_| {
                        eprintln!("Invalid --impressions value: {}", argv[i]);
                        std::process::exit(1);
                    });
                }
            }
            "--rate" => {
                i += 1;
                if i < argv.len() {
                    args.rate = argv[i].parse().unwrap_or_else(|_| {
                        eprintln!("Invalid --rate value: {}", argv[i]);
                        std::process::exit(1);
                    });
                }
            }
            "--samples" => {
                i += 1;
                if i < argv.len() {
                    args.samples = argv[i].parse().unwrap_or_else(|_| {
                        eprintln!("Invalid --samples value: {}", argv[i]);
                        std::process::exit(1);
                    });
                }
            }
            "--seed" => {
                i += 1;
                if i < argv.len() {
                    args.seed = argv[i].parse().unwrap_or_else(|_| {
                        eprintln!("Invalid --seed value: {}", argv[i]);
                        std::process::exit(1);
                    });
                }
            }
            "--epsilon" => {
                i += 1;
                if i < argv.len() {
                    args.epsilon = argv[i].parse().unwrap_or_else(|_| {
                        eprintln!("Invalid --epsilon value: {}", argv[i]);
                        std::process::exit(1);
                    });
                }
            }
            "--json" => args.json = true,
            "--agreement" => args.agreement = true,
            "--help" | "-h" => {
                println!("Usage: simulate [--impressions N] [--rate R] [--samples N] [--seed S] [--epsilon E] [--json] [--agreement]");
                println!();
                println!("Options:");
                println!("  --impressions N  Campaign size (default: 1000000)");
                println!("  --rate R         Mean conversion rate in (0,1) (default: 0.05)");
                println!("  --samples N      Simulated campaigns for percentiles (default: 1000000)");
                println!("  --seed S         RNG seed (default: {})", DEFAULT_SEED);
                println!("  --epsilon E      Privacy budget for the noise report (default: 1.0)");
                println!("  --json           Emit the percentile summary as JSON");
                println!("  --agreement      Sweep decision agreement across epsilons");
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                std::process::exit(1);
            }
        }
        i += 1;
    }
    args
}

fn main() {
    let args = parse_args();

    let variance = default_variance(args.rate).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });

    println!(
        "Campaign simulation ({} impressions, rate {}, {} samples)",
        args.impressions, args.rate, args.samples
    );
    println!("  Variance: {:.6e}", variance);

    let t0 = Instant::now();
    let summary = summarize_campaign(
        args.impressions,
        args.rate,
        variance,
        args.samples,
        Some(args.seed),
        |pct| {
            print!("\r  Simulating... {:>3}%", pct);
            let _ = std::io::stdout().flush();
            true
        },
    )
    .unwrap_or_else(|e| {
        eprintln!("\nEstimation failed: {}", e);
        std::process::exit(1);
    });
    println!("\r  Simulated in {:.1} ms", t0.elapsed().as_secs_f64() * 1000.0);
    println!();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary).unwrap());
    } else {
        println!("Expected range of results:");
        for entry in &summary.entries {
            println!(
                "  p{:<4} {:<10} {:>12.0} conversions  ({:.2}%)",
                (entry.percentile * 100.0) as u32,
                entry.label,
                entry.conversions,
                entry.conversion_rate * 100.0
            );
        }
    }

    let band = laplace_ppf(0.975, DEFAULT_SENSITIVITY, args.epsilon).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });
    println!();
    println!(
        "Laplace noise at epsilon {}: 95% of draws within ±{:.2} conversions",
        args.epsilon, band
    );

    if args.agreement {
        let median = summary
            .entry_at(0.5)
            .unwrap_or_else(|| {
                eprintln!("No median in percentile summary");
                std::process::exit(1);
            })
            .conversions;
        let p40 = median * 0.98;
        let p60 = median * 1.02;
        println!();
        println!("Decision agreement vs epsilon (median threshold {:.0}):", median);
        for exp in -8..=3 {
            let epsilon = 2f64.powi(exp);
            let questions = generate_questions(
                args.impressions,
                args.rate,
                variance,
                DEFAULT_SENSITIVITY,
                epsilon,
                10_000,
                Some(args.seed),
            )
            .unwrap_or_else(|e| {
                eprintln!("Question generation failed: {}", e);
                std::process::exit(1);
            });
            let bound = laplace_ppf(0.975, DEFAULT_SENSITIVITY, epsilon).unwrap();
            let threshold =
                decision_agreement(&ThresholdRule { threshold: median }, &questions, bound);
            let maintain = decision_agreement(
                &BandRule {
                    lower: p40,
                    upper: p60,
                },
                &questions,
                bound,
            );
            println!(
                "  epsilon 2^{:<3} threshold {:>6.3}  band {:>6.3}",
                exp, threshold, maintain
            );
        }
    }
}
