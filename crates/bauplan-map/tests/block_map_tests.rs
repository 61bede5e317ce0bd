use bauplan_blocks::{Block, BlockState};
use bauplan_geom::Vec3;
use bauplan_map::{BlockMap, MapError, MapSize};

fn stone() -> Block {
    Block::named("minecraft:stone")
}

fn dirt() -> Block {
    Block::named("minecraft:dirt")
}

fn glass() -> Block {
    Block::named("minecraft:glass")
}

#[test]
fn set_get_delete_roundtrip() {
    let mut map = BlockMap::fixed(Vec3::new(2, 2, 2));
    let pos = Vec3::new(1, 0, 1);
    map.set(pos, stone()).unwrap();
    assert_eq!(map.get(pos), Some(&stone()));
    map.delete(pos);
    assert_eq!(map.get(pos), None);
    assert!(map.is_empty());
}

#[test]
fn deleting_vacant_position_is_a_noop() {
    let mut map = BlockMap::fixed(Vec3::new(2, 2, 2));
    map.set(Vec3::ZERO, stone()).unwrap();
    map.delete(Vec3::new(1, 1, 1));
    assert_eq!(map.len(), 1);
    assert_eq!(map.get(Vec3::ZERO), Some(&stone()));
}

#[test]
fn fixed_size_rejects_out_of_bounds_writes() {
    let size = Vec3::new(2, 2, 2);
    let mut map = BlockMap::fixed(size);
    for pos in [
        Vec3::new(2, 0, 0),
        Vec3::new(0, 2, 0),
        Vec3::new(0, 0, 2),
        Vec3::new(-1, 0, 0),
    ] {
        assert_eq!(
            map.set(pos, stone()),
            Err(MapError::OutOfBounds { pos, size })
        );
    }
    assert!(map.is_empty());
}

#[test]
fn auto_size_accepts_any_position() {
    let mut map = BlockMap::auto();
    map.set(Vec3::new(-10, 4, 100), stone()).unwrap();
    assert_eq!(map.get(Vec3::new(-10, 4, 100)), Some(&stone()));
}

#[test]
fn set_overwrites_last_write_wins() {
    let mut map = BlockMap::fixed(Vec3::new(1, 1, 1));
    map.set(Vec3::ZERO, stone()).unwrap();
    map.set(Vec3::ZERO, dirt()).unwrap();
    assert_eq!(map.get(Vec3::ZERO), Some(&dirt()));
}

#[test]
fn bounds_of_empty_map_fails() {
    let map = BlockMap::auto();
    assert_eq!(map.bounds(), Err(MapError::Empty));
}

#[test]
fn bounds_and_actual_size_auto() {
    let mut map = BlockMap::auto();
    map.set(Vec3::new(-1, 2, 5), stone()).unwrap();
    map.set(Vec3::new(3, 0, 7), dirt()).unwrap();
    let (low, high) = map.bounds().unwrap();
    assert_eq!(low, Vec3::new(-1, 0, 5));
    assert_eq!(high, Vec3::new(3, 2, 7));
    assert_eq!(map.actual_size(), Vec3::new(5, 3, 3));
}

#[test]
fn actual_size_fixed_ignores_occupancy() {
    let mut map = BlockMap::fixed(Vec3::new(4, 5, 6));
    assert_eq!(map.actual_size(), Vec3::new(4, 5, 6));
    map.set(Vec3::ZERO, stone()).unwrap();
    assert_eq!(map.actual_size(), Vec3::new(4, 5, 6));
}

#[test]
fn actual_size_auto_empty_is_zero() {
    assert_eq!(BlockMap::auto().actual_size(), Vec3::ZERO);
}

#[test]
fn iteration_is_layer_row_column_ordered() {
    let mut map = BlockMap::auto();
    map.set(Vec3::new(1, 0, 0), stone()).unwrap();
    map.set(Vec3::new(0, 1, 0), dirt()).unwrap();
    map.set(Vec3::new(0, 0, 1), glass()).unwrap();
    map.set(Vec3::new(0, 0, 0), stone()).unwrap();
    let order: Vec<Vec3> = map.iter().map(|(p, _)| p).collect();
    assert_eq!(
        order,
        vec![
            Vec3::new(0, 0, 0),
            Vec3::new(0, 0, 1),
            Vec3::new(1, 0, 0),
            Vec3::new(0, 1, 0),
        ]
    );
}

#[test]
fn keep_remove_replace() {
    let positions = [Vec3::new(0, 0, 0), Vec3::new(1, 0, 0), Vec3::new(2, 0, 0)];
    let build = || {
        let mut map = BlockMap::fixed(Vec3::new(3, 1, 1));
        map.set(positions[0], stone()).unwrap();
        map.set(positions[1], dirt()).unwrap();
        map.set(positions[2], stone()).unwrap();
        map
    };

    let mut kept = build();
    kept.keep_blocks(&[stone()]);
    assert_eq!(kept.len(), 2);
    assert_eq!(kept.get(positions[0]), Some(&stone()));
    assert_eq!(kept.get(positions[1]), None);
    assert_eq!(kept.get(positions[2]), Some(&stone()));

    let mut removed = build();
    removed.remove_blocks(&[stone()]);
    assert_eq!(removed.len(), 1);
    assert_eq!(removed.get(positions[1]), Some(&dirt()));

    let mut replaced = build();
    replaced.replace_blocks(&[stone()], &glass());
    assert_eq!(replaced.get(positions[0]), Some(&glass()));
    assert_eq!(replaced.get(positions[1]), Some(&dirt()));
    assert_eq!(replaced.get(positions[2]), Some(&glass()));
}

#[test]
fn bulk_ops_use_the_subset_predicate() {
    let tagged = stone().with_state(BlockState::new().with("a", 1i64).with("b", 2i64));
    let mut map = BlockMap::fixed(Vec3::new(2, 1, 1));
    map.set(Vec3::new(0, 0, 0), stone().with_state(BlockState::new().with("a", 1i64)))
        .unwrap();
    map.set(Vec3::new(1, 0, 0), tagged.clone()).unwrap();
    // The candidate's properties must all appear in the pattern's; the
    // fully-tagged pattern therefore matches both cells.
    map.remove_blocks(&[tagged]);
    assert!(map.is_empty());
}

#[test]
fn scan_uses_exact_equality() {
    let tagged = stone().with_state(BlockState::new().with("a", 1i64));
    let mut map = BlockMap::fixed(Vec3::new(3, 1, 1));
    map.set(Vec3::new(0, 0, 0), stone()).unwrap();
    map.set(Vec3::new(1, 0, 0), tagged.clone()).unwrap();
    map.set(Vec3::new(2, 0, 0), stone()).unwrap();
    assert_eq!(map.scan(&stone()), vec![Vec3::new(0, 0, 0), Vec3::new(2, 0, 0)]);
    assert_eq!(map.scan(&tagged), vec![Vec3::new(1, 0, 0)]);
}

#[test]
fn merge_applies_offset_and_overwrites() {
    let mut a = BlockMap::auto();
    a.set(Vec3::new(2, 0, 0), stone()).unwrap();
    let mut b = BlockMap::auto();
    b.set(Vec3::new(0, 0, 0), dirt()).unwrap();
    b.set(Vec3::new(1, 0, 0), glass()).unwrap();
    a.merge(&b, Vec3::new(2, 0, 0));
    // Overlap at (2,0,0): the merged-in block wins.
    assert_eq!(a.get(Vec3::new(2, 0, 0)), Some(&dirt()));
    assert_eq!(a.get(Vec3::new(3, 0, 0)), Some(&glass()));
}

#[test]
fn merge_ignores_fixed_bounds_of_destination() {
    let mut parent = BlockMap::fixed(Vec3::new(1, 1, 1));
    let mut child = BlockMap::auto();
    child.set(Vec3::new(5, 5, 5), stone()).unwrap();
    parent.merge(&child, Vec3::ZERO);
    assert_eq!(parent.get(Vec3::new(5, 5, 5)), Some(&stone()));
}

#[test]
fn ascii_rendering_is_top_down_with_stable_symbols() {
    let mut map = BlockMap::fixed(Vec3::new(1, 2, 2));
    map.set(Vec3::new(0, 0, 0), stone()).unwrap();
    map.set(Vec3::new(0, 0, 1), dirt()).unwrap();
    map.set(Vec3::new(0, 1, 0), stone()).unwrap();
    // Top layer (y=1) renders first; stone was seen first so it gets `0`.
    assert_eq!(map.to_ascii(), "0.\n\n01");
}

#[test]
fn ascii_rendering_of_empty_map_is_empty() {
    assert_eq!(BlockMap::auto().to_ascii(), "");
}
