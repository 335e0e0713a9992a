//! Use an externally chosen node grid and check plan agreement.

use hyperlayout::{LatticeShape, LayoutConfig, LayoutStrategy, PartitionPlan, Partitioner};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter("hyperlayout=debug,info")
        .init();

    let shape = LatticeShape::new(8, 8, 8, 16);
    let config = LayoutConfig::new(shape, 8).with_node_grid([1, 2, 2, 2]);
    let partitioner = Partitioner::new(config);
    let fixed = partitioner.plan()?;

    println!("Fixed grid {:?}:", fixed.nsquares());
    println!("  Squaresize: {:?}", fixed.squaresize());
    println!("  Sites on node: {}", fixed.sites_on_node());

    // A peer that bisected instead would end up with a different layout.
    let bisected = Partitioner::new(
        LayoutConfig::new(shape, 8).with_strategy(LayoutStrategy::Bisection),
    )
    .plan()?;
    println!("\nBisected grid {:?}", bisected.nsquares());

    let bytes = bisected.to_bytes()?;
    let received = PartitionPlan::from_bytes(&bytes)?;
    match fixed.ensure_agrees(received.fingerprint()) {
        Ok(()) => println!("Plans agree"),
        Err(e) => println!("Plans disagree: {e}"),
    }

    // A grid that does not divide the lattice is rejected.
    let bad = Partitioner::new(LayoutConfig::new(shape, 8).with_node_grid([8, 1, 1, 3]));
    if let Err(e) = bad.plan() {
        println!("\nRejected: {e}");
    }

    print!("\n{}", partitioner.metrics().to_prometheus());

    Ok(())
}
