//! Lay out a lattice by bisection and inspect the result.

use hyperlayout::{GlobalCoordinate, LatticeShape, LayoutConfig, Parity, Partitioner};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter("hyperlayout=debug,info")
        .init();

    let config =
        LayoutConfig::new(LatticeShape::new(16, 16, 16, 32), 64).with_io_geometry([2, 1, 1, 1]);

    println!("Laying out {} on {} nodes...", config.shape, config.node_count);

    let partitioner = Partitioner::new(config);
    let layout = partitioner.build()?;
    let plan = &layout.plan;

    println!("\nPlan:");
    println!("  Squaresize: {:?}", plan.squaresize());
    println!("  Nsquares: {:?}", plan.nsquares());
    println!("  Sites on node: {}", plan.sites_on_node());
    println!("  Sites per sub-lattice: {}", plan.subl_sites_on_node());
    println!("  Even sites: {:?}", plan.parity_range(Parity::Even));
    println!("  Odd sites: {:?}", plan.parity_range(Parity::Odd));
    println!("  Fingerprint: {:#018x}", plan.fingerprint());

    println!("\n--- Site Queries ---");
    for site in [
        GlobalCoordinate::ORIGIN,
        GlobalCoordinate::new(1, 0, 0, 0),
        GlobalCoordinate::new(2, 0, 0, 0),
        GlobalCoordinate::new(9, 3, 14, 27),
    ] {
        let node = plan.node_of(site);
        let index = plan.local_index_of(site);
        println!(
            "  {site} -> node {node}, index {index} ({}) -> {}",
            plan.parity_of(site),
            plan.coord_of(node, index)
        );
    }

    println!("\n--- I/O Nodes ---");
    for io_node in layout.io.io_nodes() {
        println!("  Node {io_node} origin {}", plan.node_origin(io_node));
    }

    // Show metrics
    let snapshot = partitioner.metrics().snapshot();
    println!("\nMetrics:");
    println!("  Plans computed: {}", snapshot.plans_computed);
    println!("  Bisections: {}", snapshot.bisections);

    Ok(())
}
