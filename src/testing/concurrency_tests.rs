//! Tests for sharing plans across threads.
//!
//! These tests verify that one plan queried from several threads gives the
//! same answers, and that plans built independently on separate threads
//! agree after a round trip through the wire encoding.

#[cfg(test)]
mod concurrency_tests {
    use crate::partitioning::{compute_plan, PartitionPlan};
    use crate::types::{GlobalCoordinate, LatticeShape, LocalIndex, NodeId};
    use std::sync::Arc;
    use std::thread;

    fn index_all(plan: &PartitionPlan) -> Vec<(NodeId, LocalIndex)> {
        plan.shape()
            .coordinates()
            .map(|c| (plan.node_of(c), plan.local_index_of(c)))
            .collect()
    }

    #[test]
    fn test_shared_plan_queried_from_threads() {
        let plan = Arc::new(compute_plan(LatticeShape::new(8, 8, 8, 8), 16).unwrap());
        let expected = index_all(&plan);

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let plan = Arc::clone(&plan);
                thread::spawn(move || index_all(&plan))
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    }

    #[test]
    fn test_independent_processes_agree() {
        // Each "process" derives its own plan and ships it to rank 0.
        let shape = LatticeShape::new(16, 8, 8, 8);
        let root = compute_plan(shape, 8).unwrap();

        let received: Vec<Vec<u8>> = thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| s.spawn(|| compute_plan(shape, 8).unwrap().to_bytes().unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        for bytes in received {
            let remote = PartitionPlan::from_bytes(&bytes).unwrap();
            root.ensure_agrees(remote.fingerprint()).unwrap();
            assert_eq!(
                remote.coord_of(5, 100),
                root.coord_of(5, 100),
            );
        }
        assert_eq!(root.coord_of(0, 0), GlobalCoordinate::ORIGIN);
    }
}
