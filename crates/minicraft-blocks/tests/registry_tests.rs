use minicraft_blocks::config::{BlockDef, BlocksConfig, FlagName};
use minicraft_blocks::{BlockFlags, BlockRegistry, EMPTY};
use proptest::prelude::*;

fn def(name: &str, id: Option<u16>, flags: &[FlagName]) -> BlockDef {
    BlockDef {
        id,
        flags: flags.to_vec(),
        ..BlockDef::named(name)
    }
}

#[test]
fn positional_ids_follow_declaration_order() {
    let cfg = BlocksConfig {
        blocks: vec![
            def("empty", None, &[FlagName::NoPhysics, FlagName::NoRaycast]),
            def("stone", None, &[]),
            def("dirt", None, &[]),
        ],
    };
    let reg = BlockRegistry::from_config(cfg).expect("registry");
    assert_eq!(reg.count(), 3);
    assert_eq!(reg.id_by_name("stone"), Some(1));
    assert_eq!(reg.id_by_name("dirt"), Some(2));
    assert_eq!(reg.name(2), "dirt");
}

#[test]
fn flags_parse_from_toml() {
    let reg = BlockRegistry::from_toml_str(
        r#"
        [[blocks]]
        name = "empty"
        flags = ["no_physics", "no_raycast"]

        [[blocks]]
        name = "water"
        flags = ["no_physics", "gravity_water", "no_raycast"]
        color = [0, 0, 255]
    "#,
    )
    .unwrap();
    let water = reg.get(1).unwrap();
    assert_eq!(
        water.flags,
        BlockFlags::NO_PHYSICS | BlockFlags::GRAVITY_WATER | BlockFlags::NO_RAYCAST
    );
    assert_eq!(water.color, [0, 0, 255]);
}

#[test]
fn empty_id_always_passes_through() {
    // Config forgot the flags on id 0
    let cfg = BlocksConfig {
        blocks: vec![def("air", Some(0), &[]), def("stone", Some(1), &[])],
    };
    let reg = BlockRegistry::from_config(cfg).unwrap();
    let flags = reg.flags(EMPTY);
    assert!(flags.contains(BlockFlags::NO_PHYSICS));
    assert!(flags.contains(BlockFlags::NO_RAYCAST));
}

#[test]
fn gaps_become_flagless_placeholders() {
    let cfg = BlocksConfig {
        blocks: vec![def("empty", Some(0), &[]), def("far", Some(4), &[])],
    };
    let reg = BlockRegistry::from_config(cfg).unwrap();
    assert_eq!(reg.count(), 5);
    assert_eq!(reg.get(2).unwrap().id, 2);
    assert_eq!(reg.flags(2), BlockFlags::empty());
}

#[test]
fn rejects_empty_config() {
    assert!(BlockRegistry::from_config(BlocksConfig::default()).is_err());
    assert!(BlockRegistry::from_toml_str("").is_err());
}

#[test]
fn rejects_duplicates() {
    let dup_name = BlocksConfig {
        blocks: vec![def("a", None, &[]), def("a", None, &[])],
    };
    assert!(BlockRegistry::from_config(dup_name).is_err());
    let dup_id = BlocksConfig {
        blocks: vec![def("a", Some(1), &[]), def("b", Some(1), &[])],
    };
    assert!(BlockRegistry::from_config(dup_id).is_err());
}

#[test]
fn half_block_requires_stacked_form() {
    let dangling = BlocksConfig {
        blocks: vec![def("empty", None, &[]), def("slab", None, &[FlagName::HalfBlock])],
    };
    let err = BlockRegistry::from_config(dangling).unwrap_err();
    assert!(err.to_string().contains("slab"));

    let ok = BlocksConfig {
        blocks: vec![
            def("empty", None, &[]),
            def("slab", None, &[FlagName::HalfBlock]),
            def("slab_double", None, &[]),
        ],
    };
    assert!(BlockRegistry::from_config(ok).is_ok());
}

#[test]
fn rejects_unknown_flag_names() {
    let res = BlockRegistry::from_toml_str(
        r#"
        [[blocks]]
        name = "empty"
        flags = ["bouncy"]
    "#,
    );
    assert!(res.is_err());
}

proptest! {
    // Lookups past the table never fail and never carry behavior.
    #[test]
    fn out_of_range_ids_default_to_no_flags(id in 16u16..=u16::MAX) {
        let reg = BlockRegistry::builtin().unwrap();
        prop_assert_eq!(reg.flags(id), BlockFlags::empty());
        prop_assert!(reg.get(id).is_none());
    }
}
