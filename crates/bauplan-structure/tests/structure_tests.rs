use bauplan_blocks::{Block, BlockState, Compound};
use bauplan_geom::Vec3;
use bauplan_map::{BlockMap, MapError};
use bauplan_structure::{
    StructureSerializer, from_structure_data, to_structure_data,
};

fn stone() -> Block {
    Block::named("minecraft:stone")
}

fn dirt() -> Block {
    Block::named("minecraft:dirt")
}

#[test]
fn single_cell_end_to_end() {
    let mut map = BlockMap::fixed(Vec3::new(1, 1, 1));
    map.set(Vec3::ZERO, stone()).unwrap();
    let data = to_structure_data(&map).unwrap();
    assert_eq!(data.size, Vec3::new(1, 1, 1));
    assert_eq!(data.palette.len(), 1);
    assert_eq!(data.palette[0].index, 0);
    assert_eq!(data.palette[0].block, stone());
    assert_eq!(data.blocks.len(), 1);
    assert_eq!(data.blocks[0].state, 0);
    assert_eq!(data.blocks[0].pos, Vec3::ZERO);
    assert_eq!(data.blocks[0].data, None);
    assert!(data.entities.is_empty());
}

#[test]
fn empty_map_cannot_serialize() {
    let map = BlockMap::fixed(Vec3::new(2, 2, 2));
    assert!(matches!(to_structure_data(&map), Err(MapError::Empty)));
}

#[test]
fn palette_dedup_is_first_seen_ordered() {
    let mut map = BlockMap::fixed(Vec3::new(4, 1, 1));
    map.set(Vec3::new(0, 0, 0), stone()).unwrap();
    map.set(Vec3::new(1, 0, 0), dirt()).unwrap();
    map.set(Vec3::new(2, 0, 0), stone()).unwrap();
    map.set(Vec3::new(3, 0, 0), dirt()).unwrap();
    let data = to_structure_data(&map).unwrap();
    assert_eq!(data.palette.len(), 2);
    assert_eq!(data.palette[0].block, stone());
    assert_eq!(data.palette[1].block, dirt());
    let states: Vec<usize> = data.blocks.iter().map(|b| b.state).collect();
    assert_eq!(states, vec![0, 1, 0, 1]);
}

#[test]
fn state_distinguishes_palette_entries() {
    let tagged = stone().with_state(BlockState::new().with("variant", "smooth"));
    let mut map = BlockMap::fixed(Vec3::new(2, 1, 1));
    map.set(Vec3::new(0, 0, 0), stone()).unwrap();
    map.set(Vec3::new(1, 0, 0), tagged.clone()).unwrap();
    let data = to_structure_data(&map).unwrap();
    assert_eq!(data.palette.len(), 2);
    assert_eq!(data.palette[1].block, tagged);
}

#[test]
fn data_rides_the_placement_not_the_palette() {
    let chest = Block::named("minecraft:chest");
    let locked = chest.with_data(Compound::new().with("lock", "key"));
    let mut map = BlockMap::fixed(Vec3::new(2, 1, 1));
    map.set(Vec3::new(0, 0, 0), chest.clone()).unwrap();
    map.set(Vec3::new(1, 0, 0), locked).unwrap();
    let data = to_structure_data(&map).unwrap();
    // Same name+state: one palette entry, data kept per placement.
    assert_eq!(data.palette.len(), 1);
    assert_eq!(data.palette[0].block, chest);
    assert_eq!(data.blocks[0].data, None);
    assert_eq!(
        data.blocks[1].data,
        Some(Compound::new().with("lock", "key"))
    );
}

#[test]
fn auto_size_recalibrates_positions_to_origin() {
    let mut map = BlockMap::auto();
    map.set(Vec3::new(5, 2, -3), stone()).unwrap();
    map.set(Vec3::new(6, 3, -2), dirt()).unwrap();
    let data = to_structure_data(&map).unwrap();
    assert_eq!(data.size, Vec3::new(2, 2, 2));
    assert_eq!(data.blocks[0].pos, Vec3::ZERO);
    assert_eq!(data.blocks[1].pos, Vec3::new(1, 1, 1));
}

#[test]
fn fixed_size_positions_are_not_recalibrated() {
    let mut map = BlockMap::fixed(Vec3::new(4, 4, 4));
    map.set(Vec3::new(2, 2, 2), stone()).unwrap();
    let data = to_structure_data(&map).unwrap();
    assert_eq!(data.blocks[0].pos, Vec3::new(2, 2, 2));
    assert_eq!(data.size, Vec3::new(4, 4, 4));
}

#[test]
fn serialization_is_deterministic() {
    let mut map = BlockMap::fixed(Vec3::new(3, 3, 3));
    for x in 0..3 {
        for z in 0..3 {
            let block = if (x + z) % 2 == 0 { stone() } else { dirt() };
            map.set(Vec3::new(x, 0, z), block).unwrap();
        }
    }
    let first = to_structure_data(&map).unwrap();
    let second = to_structure_data(&map).unwrap();
    assert_eq!(first, second);
    let a = serde_json::to_string(&first).unwrap();
    let b = serde_json::to_string(&second).unwrap();
    assert_eq!(a, b);
}

#[test]
fn structure_data_round_trips_through_block_map() {
    let tagged = stone().with_state(BlockState::new().with("variant", "smooth"));
    let locked = Block::named("minecraft:chest").with_data(Compound::new().with("lock", "key"));
    let mut map = BlockMap::fixed(Vec3::new(2, 2, 2));
    map.set(Vec3::new(0, 0, 0), stone()).unwrap();
    map.set(Vec3::new(1, 0, 1), tagged).unwrap();
    map.set(Vec3::new(0, 1, 1), locked).unwrap();

    let data = to_structure_data(&map).unwrap();
    let rebuilt = from_structure_data(&data).unwrap();
    let original: Vec<(Vec3, Block)> = map.iter().map(|(p, b)| (p, b.clone())).collect();
    let restored: Vec<(Vec3, Block)> = rebuilt.iter().map(|(p, b)| (p, b.clone())).collect();
    assert_eq!(original, restored);
}

#[test]
fn bad_palette_index_is_rejected() {
    let mut map = BlockMap::fixed(Vec3::new(1, 1, 1));
    map.set(Vec3::ZERO, stone()).unwrap();
    let mut data = to_structure_data(&map).unwrap();
    data.blocks[0].state = 7;
    assert!(from_structure_data(&data).is_err());
}

#[test]
fn file_shape_carries_version_and_stringified_properties() {
    let tagged = stone().with_state(BlockState::new().with("open", true).with("layers", 3i64));
    let mut map = BlockMap::fixed(Vec3::new(1, 1, 1));
    map.set(Vec3::ZERO, tagged).unwrap();
    let data = to_structure_data(&map).unwrap();
    let file = StructureSerializer::new(3953).serialize(&data);
    assert_eq!(file.data_version, 3953);
    let props = file.palette[0].properties.as_ref().unwrap();
    assert_eq!(props.get("open").map(String::as_str), Some("true"));
    assert_eq!(props.get("layers").map(String::as_str), Some("3"));

    let json = serde_json::to_value(&file).unwrap();
    assert!(json.get("DataVersion").is_some());
    assert_eq!(json["palette"][0]["Name"], "minecraft:stone");
    assert_eq!(json["size"], serde_json::json!([1, 1, 1]));
}

#[test]
fn file_shape_omits_absent_properties_and_nbt() {
    let mut map = BlockMap::fixed(Vec3::new(1, 1, 1));
    map.set(Vec3::ZERO, stone()).unwrap();
    let data = to_structure_data(&map).unwrap();
    let file = StructureSerializer::new(1).serialize(&data);
    let json = serde_json::to_value(&file).unwrap();
    assert!(json["palette"][0].get("Properties").is_none());
    assert!(json["blocks"][0].get("nbt").is_none());
}
