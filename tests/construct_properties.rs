//! Property tests for placement and mirroring
//!
//! Random request sequences against a one-block library: every call either
//! lands completely or leaves the engine untouched, and the cell map always
//! agrees with the component records.

use glam::IVec3;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use shipwright::catalog::{BlockCatalog, BlockCategory, PrefabLibrary};
use shipwright::construct::{ConstructEngine, PlacementRequest};
use shipwright::core::config::ConstructionRules;
use shipwright::core::types::BoundingBox;
use shipwright::grid::RestrictionTag;
use shipwright::symmetry::{mirror_box, MirrorAxis};

const PREFABS: &str = r#"
[[prefab]]
category = "armor"

[[prefab.block]]
min = [0, 0, 0]
block = "CubeBlock/LargeBlockArmorBlock"
"#;

const BLOCKS: &str = r#"
[[block]]
id = "CubeBlock/LargeBlockArmorBlock"
display_name = "Light Armor Block"
"#;

fn catalogs() -> (PrefabLibrary, BlockCatalog) {
    (
        PrefabLibrary::from_toml_str(PREFABS).unwrap(),
        BlockCatalog::from_toml_str(BLOCKS).unwrap(),
    )
}

fn cell(range: i32) -> impl Strategy<Value = IVec3> {
    (-range..=range, -range..=range, -range..=range).prop_map(|(x, y, z)| IVec3::new(x, y, z))
}

/// Well-formed box with a min corner in range and sides of 1..=3 cells
fn small_box(range: i32) -> impl Strategy<Value = BoundingBox> {
    (cell(range), 0..3i32, 0..3i32, 0..3i32)
        .prop_map(|(min, dx, dy, dz)| BoundingBox::new(min, min + IVec3::new(dx, dy, dz)))
}

#[derive(Debug, Clone)]
enum Step {
    Place {
        bounds: BoundingBox,
        x: bool,
        y: bool,
        through_zones: bool,
    },
    Zone(BoundingBox),
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        3 => (small_box(4), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
            |(bounds, x, y, through_zones)| Step::Place {
                bounds,
                x,
                y,
                through_zones
            }
        ),
        1 => small_box(4).prop_map(Step::Zone),
    ]
}

fn axis() -> impl Strategy<Value = MirrorAxis> {
    prop_oneof![Just(MirrorAxis::X), Just(MirrorAxis::Y), Just(MirrorAxis::XY)]
}

proptest! {
    #[test]
    fn prop_mirror_is_an_involution(bounds in small_box(50), axis in axis()) {
        let mirrored = mirror_box(&bounds, axis).unwrap();
        prop_assert!(mirrored.is_well_formed());
        prop_assert_eq!(mirrored.cell_count(), bounds.cell_count());
        prop_assert_eq!(mirrored.min.z, bounds.min.z);
        prop_assert_eq!(mirrored.max.z, bounds.max.z);
        prop_assert_eq!(mirror_box(&mirrored, axis), Some(bounds));
    }

    #[test]
    fn prop_placement_claims_exactly_its_box(bounds in small_box(20)) {
        let (library, catalog) = catalogs();
        let mut engine = ConstructEngine::new(
            ConstructionRules::default(),
            &mut ChaCha8Rng::seed_from_u64(0),
            &library,
            &catalog,
        )
        .unwrap();

        let report = engine
            .place(&PlacementRequest::new(BlockCategory::Armor, bounds.min, bounds.max))
            .unwrap();
        let id = report.components[0];

        prop_assert_eq!(engine.occupied_cell_count() as u64, bounds.cell_count());
        for cell in bounds.cells() {
            prop_assert_eq!(engine.block_at(cell).map(|c| c.id), Some(id));
        }
        let outside = bounds.max + IVec3::ONE;
        prop_assert!(engine.block_at(outside).is_none());
    }

    #[test]
    fn prop_every_call_is_all_or_nothing(steps in prop::collection::vec(step(), 1..24)) {
        let (library, catalog) = catalogs();
        let mut engine = ConstructEngine::new(
            ConstructionRules::default(),
            &mut ChaCha8Rng::seed_from_u64(7),
            &library,
            &catalog,
        )
        .unwrap();

        for step in steps {
            let before = engine.occupancy().clone();
            let components_before = engine.component_count();

            match step {
                Step::Place { bounds, x, y, through_zones } => {
                    let mut request = PlacementRequest::new(BlockCategory::Armor, bounds.min, bounds.max)
                        .with_symmetry(x, y);
                    if through_zones {
                        request = request.allowing(RestrictionTag::ReservedZone);
                    }
                    let expected = request.symmetry.instance_count();

                    match engine.place(&request) {
                        Ok(report) => {
                            prop_assert_eq!(report.components.len(), expected);
                            prop_assert_eq!(engine.component_count(), components_before + expected);
                        }
                        Err(_) => {
                            prop_assert_eq!(engine.occupancy(), &before);
                            prop_assert_eq!(engine.component_count(), components_before);
                        }
                    }
                }
                Step::Zone(bounds) => {
                    if engine.reserve_zone(bounds.min, bounds.max).is_err() {
                        prop_assert_eq!(engine.occupancy(), &before);
                    }
                    prop_assert_eq!(engine.component_count(), components_before);
                }
            }

            prop_assert!(engine.audit().is_empty(), "audit: {:?}", engine.audit());
            let claimed: u64 = engine.components().iter().map(|c| c.bounds.cell_count()).sum();
            prop_assert_eq!(engine.occupied_cell_count() as u64, claimed);
        }
    }

    #[test]
    fn prop_disjoint_placements_commute(a in small_box(10), b in small_box(10)) {
        prop_assume!(!a.intersects(&b));
        let (library, catalog) = catalogs();

        let occupied = |first: BoundingBox, second: BoundingBox| {
            let mut engine = ConstructEngine::new(
                ConstructionRules::default(),
                &mut ChaCha8Rng::seed_from_u64(3),
                &library,
                &catalog,
            )
            .unwrap();
            engine
                .place(&PlacementRequest::new(BlockCategory::Armor, first.min, first.max))
                .unwrap();
            engine
                .place(&PlacementRequest::new(BlockCategory::Armor, second.min, second.max))
                .unwrap();
            let mut cells: Vec<(i32, i32, i32, u64)> = engine
                .components()
                .iter()
                .flat_map(|c| c.bounds.cells().map(move |cell| (cell.x, cell.y, cell.z, c.bounds.cell_count())))
                .collect();
            cells.sort_unstable();
            cells
        };

        prop_assert_eq!(occupied(a, b), occupied(b, a));
    }
}
