//! Grows a disjoint rule set over a small labelled dataset, drops some of
//! its rules and regrows the uncovered gaps.
//!
//! Run with `RUST_LOG=hyperrule=debug` to see each accepted rule.

use hyperrule::rules::{Antecedent, Condition, FeatureTest};
use hyperrule::{
    Consequent, ConsistencyChecker, Dataset, FeatureType, GenerationConfig, InMemoryDataset, Rule,
    RuleGenerator, RuleSet,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut rng = StdRng::seed_from_u64(42);

    // Two continuous features and one categorical "region" code.
    let mut rows = Vec::new();
    let mut labels = Vec::new();
    for _ in 0..60 {
        let x: f64 = rng.gen_range(0.0..10.0);
        let y: f64 = rng.gen_range(0.0..10.0);
        let region = rng.gen_range(0..3) as f64;
        labels.push(if x + y < 8.0 { 0 } else if x > y { 1 } else { 2 });
        rows.push(vec![x, y, region]);
    }
    let dataset = InMemoryDataset::new(
        vec![
            FeatureType::Continuous,
            FeatureType::Continuous,
            FeatureType::Categorical,
        ],
        rows,
    )?;

    // Seed rules as an outer search would leave them: a few hand-placed
    // regions, the rest of the space uncovered.
    let seeded = RuleSet::from_rules([
        Rule::new(
            Antecedent::new(vec![
                FeatureTest::new(0, Condition::InRange { lower: 0.0, upper: 4.0 }),
                FeatureTest::new(1, Condition::InRange { lower: 0.0, upper: 4.0 }),
            ])?,
            Consequent::single(0),
        ),
        Rule::new(
            Antecedent::new(vec![
                FeatureTest::new(0, Condition::InRange { lower: 6.0, upper: 10.0 }),
                FeatureTest::new(1, Condition::InRange { lower: 0.0, upper: 3.0 }),
            ])?,
            Consequent::single(1),
        ),
    ])?;

    let generator = RuleGenerator::new(GenerationConfig::default());
    let report = generator.extend(&dataset, &labels, seeded, &mut rng)?;

    println!("Rules after first pass:");
    println!("{}", report.rules);
    println!("{}", report);
    println!();

    // Drop every other rule and fill the holes again.
    let kept = RuleSet::from_rules(
        report
            .rules
            .into_iter()
            .enumerate()
            .filter(|(i, _)| i % 2 == 0)
            .map(|(_, rule)| rule),
    )?;
    let kept_count = kept.len();
    let refill = generator.extend(&dataset, &labels, kept, &mut rng)?;

    println!("Rules after refilling ({} kept):", kept_count);
    println!("{}", refill.rules);
    println!("{}", refill);
    println!();

    let checker = ConsistencyChecker::with_cache_capacity(&dataset, 64);
    let conflicts = checker.conflict_graph(&refill.rules)?;
    println!(
        "Conflicting rule pairs: {} across {} groups",
        conflicts.conflict_count(),
        conflicts.component_count()
    );

    let mut correct = 0;
    for (i, &label) in labels.iter().enumerate() {
        let predicted = refill.rules.predict(dataset.instance(i));
        if predicted.iter().any(|c| c.contains(label)) {
            correct += 1;
        }
    }
    println!(
        "Training instances whose rule predicts their label: {}/{}",
        correct,
        labels.len()
    );

    Ok(())
}
