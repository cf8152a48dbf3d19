//! Property tests over generated towns
//!
//! Each case generates a full town from a random seed and checks the hop
//! distance table behaves like a graph metric.

use proptest::prelude::*;
use town_layout::core::config::LayoutConfig;
use town_layout::core::types::ParcelId;
use town_layout::town::Town;

fn generate(seed: u64) -> Town {
    match Town::generate(&LayoutConfig::default().with_seed(seed)) {
        Ok(town) => town,
        Err(e) => panic!("seed {}: {}", seed, e),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(6))]

    #[test]
    fn distances_form_a_metric(seed in 0u64..10_000) {
        let town = generate(seed);
        prop_assert_eq!(town.graph().components(), 1);
        let table = town.distances();
        let sample: Vec<ParcelId> = town.parcels().iter().step_by(5).map(|p| p.id).collect();

        for &p in &sample {
            prop_assert_eq!(table.get(p, p), Some(0));
            for &q in &sample {
                let pq = table.get(p, q).unwrap();
                prop_assert_eq!(Some(pq), table.get(q, p));
                if p != q {
                    prop_assert!(pq > 0);
                }
                for &r in sample.iter().step_by(3) {
                    let pr = table.get(p, r).unwrap();
                    let qr = table.get(q, r).unwrap();
                    prop_assert!(pr <= pq + qr);
                }
            }
        }
    }

    #[test]
    fn adjacent_parcels_are_one_hop(seed in 0u64..10_000) {
        let town = generate(seed);
        for parcel in town.parcels() {
            for &n in &parcel.neighbors {
                prop_assert_eq!(town.parcel_distance(parcel.id, n), Some(1));
            }
        }
    }

    #[test]
    fn every_plot_is_addressed_with_parity(seed in 0u64..10_000) {
        let town = generate(seed);
        for plot in town.plots() {
            prop_assert!(!plot.frontages.is_empty());
            prop_assert!(plot.address.is_some());
            for f in &plot.frontages {
                prop_assert_eq!(f.house_number % 2 == 0, f.side.is_even());
            }
        }
    }
}
