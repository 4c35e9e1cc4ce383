//! Context lifecycle properties: state symmetry, retraction on removal,
//! skill levels, charge replacement, implants.

use dogma::{Context, Error, State};

const TYPE_DOMINIX: u32 = 645;
const TYPE_GARDE_II: u32 = 28211;
const TYPE_DRONE_DAMAGE_AMP_II: u32 = 4405;
const TYPE_OMNI_TRACKING_LINK_II: u32 = 24438;
const TYPE_RAILGUN_II: u32 = 3146;
const TYPE_SPIKE_L: u32 = 12559;
const TYPE_ANTIMATTER_L: u32 = 230;
const TYPE_DD_603_IMPLANT: u32 = 10228;
const SKILL_DRONE_DURABILITY: u32 = 23618;

const ATT_MAX_RANGE: u16 = 54;
const ATT_DAMAGE_MULTIPLIER: u16 = 64;
const ATT_ARMOR_HP: u16 = 265;
const ATT_DRONE_ARMOR_BONUS_PER_LEVEL: u16 = 601;

fn setup() {
    dogma::init().expect("catalogue pack required for context tests");
}

#[test]
fn init_is_idempotent() {
    setup();
    dogma::init().expect("second init must be a no-op");
    let mut ctx = Context::new();
    ctx.set_ship(TYPE_DOMINIX);
    ctx.add_drone(TYPE_GARDE_II, 1);
    assert_eq!(
        ctx.drone_attribute(TYPE_GARDE_II, ATT_ARMOR_HP).unwrap(),
        1800.0
    );
}

#[test]
fn zero_state_round_trip_is_bit_identical() {
    setup();
    let mut ctx = Context::new();
    ctx.set_ship(TYPE_DOMINIX);
    ctx.add_drone(TYPE_GARDE_II, 1);
    let slot = ctx.add_module(TYPE_DRONE_DAMAGE_AMP_II);
    ctx.set_module_state(slot, State::Online).unwrap();

    let before = ctx
        .drone_attribute(TYPE_GARDE_II, ATT_DAMAGE_MULTIPLIER)
        .unwrap();
    ctx.set_module_state(slot, State::None).unwrap();
    ctx.set_module_state(slot, State::Online).unwrap();
    let after = ctx
        .drone_attribute(TYPE_GARDE_II, ATT_DAMAGE_MULTIPLIER)
        .unwrap();
    assert_eq!(before.to_bits(), after.to_bits());
}

#[test]
fn setting_the_same_ship_changes_nothing() {
    setup();
    let mut ctx = Context::new();
    ctx.set_ship(TYPE_DOMINIX);
    ctx.add_drone(TYPE_GARDE_II, 1);
    let before = ctx.drone_attribute(TYPE_GARDE_II, ATT_MAX_RANGE).unwrap();
    ctx.set_ship(TYPE_DOMINIX);
    let after = ctx.drone_attribute(TYPE_GARDE_II, ATT_MAX_RANGE).unwrap();
    assert_eq!(before.to_bits(), after.to_bits());
}

#[test]
fn removing_a_module_retracts_its_modifiers_everywhere() {
    setup();
    let mut ctx = Context::new();
    ctx.set_ship(TYPE_DOMINIX);
    ctx.add_drone(TYPE_GARDE_II, 1);
    let untouched = ctx
        .drone_attribute(TYPE_GARDE_II, ATT_DAMAGE_MULTIPLIER)
        .unwrap();

    let slot = ctx.add_module(TYPE_DRONE_DAMAGE_AMP_II);
    ctx.set_module_state(slot, State::Online).unwrap();
    assert_ne!(
        untouched,
        ctx.drone_attribute(TYPE_GARDE_II, ATT_DAMAGE_MULTIPLIER)
            .unwrap()
    );

    ctx.remove_module(slot).unwrap();
    assert_eq!(
        untouched.to_bits(),
        ctx.drone_attribute(TYPE_GARDE_II, ATT_DAMAGE_MULTIPLIER)
            .unwrap()
            .to_bits()
    );
    assert_eq!(ctx.remove_module(slot), Err(Error::NotFound));
}

#[test]
fn partial_drone_removal_leaves_attributes_unchanged() {
    setup();
    let mut ctx = Context::new();
    ctx.set_ship(TYPE_DOMINIX);
    ctx.add_drone(TYPE_GARDE_II, 3);
    let before = ctx.drone_attribute(TYPE_GARDE_II, ATT_ARMOR_HP).unwrap();
    ctx.remove_drone_partial(TYPE_GARDE_II, 2);
    let after = ctx.drone_attribute(TYPE_GARDE_II, ATT_ARMOR_HP).unwrap();
    assert_eq!(before.to_bits(), after.to_bits());
}

#[test]
fn skill_levels_clamp_to_the_valid_range() {
    setup();
    let mut ctx = Context::new();
    ctx.set_ship(TYPE_DOMINIX);
    ctx.add_drone(TYPE_GARDE_II, 1);

    // Level 7 clamps to 5: the per-level bonus chain observes 5 * 5.
    ctx.set_skill_level(SKILL_DRONE_DURABILITY, 7);
    assert_eq!(
        ctx.character_attribute(ATT_DRONE_ARMOR_BONUS_PER_LEVEL).unwrap(),
        25.0
    );
    assert_eq!(
        ctx.drone_attribute(TYPE_GARDE_II, ATT_ARMOR_HP).unwrap(),
        1800.0
    );

    ctx.set_skill_level(SKILL_DRONE_DURABILITY, 0);
    assert_eq!(
        ctx.drone_attribute(TYPE_GARDE_II, ATT_ARMOR_HP).unwrap(),
        1440.0
    );
}

#[test]
fn reset_skill_levels_keeps_the_default_level() {
    setup();
    let mut ctx = Context::new();
    ctx.set_ship(TYPE_DOMINIX);
    ctx.add_drone(TYPE_GARDE_II, 1);

    ctx.set_default_skill_level(4);
    ctx.set_skill_level(SKILL_DRONE_DURABILITY, 5);
    assert_eq!(
        ctx.drone_attribute(TYPE_GARDE_II, ATT_ARMOR_HP).unwrap(),
        1800.0
    );

    ctx.reset_skill_levels();
    // Back to the default of IV: 1440 * (1 + 4 * 5%).
    assert_eq!(
        ctx.drone_attribute(TYPE_GARDE_II, ATT_ARMOR_HP).unwrap(),
        1728.0
    );

    ctx.set_default_skill_level(9);
    assert_eq!(
        ctx.drone_attribute(TYPE_GARDE_II, ATT_ARMOR_HP).unwrap(),
        1800.0
    );
}

#[test]
fn charge_replacement_fully_retracts_the_previous_charge() {
    setup();
    let mut ctx = Context::new();
    ctx.set_ship(TYPE_DOMINIX);
    let gun = ctx.add_module(TYPE_RAILGUN_II);

    assert_eq!(ctx.module_attribute(gun, ATT_MAX_RANGE).unwrap(), 30000.0);

    ctx.add_charge(gun, TYPE_SPIKE_L).unwrap();
    assert_eq!(ctx.module_attribute(gun, ATT_MAX_RANGE).unwrap(), 54000.0);

    ctx.add_charge(gun, TYPE_ANTIMATTER_L).unwrap();
    assert_eq!(ctx.module_attribute(gun, ATT_MAX_RANGE).unwrap(), 15000.0);

    ctx.remove_charge(gun).unwrap();
    assert_eq!(ctx.module_attribute(gun, ATT_MAX_RANGE).unwrap(), 30000.0);
    assert_eq!(
        ctx.charge_attribute(gun, ATT_MAX_RANGE),
        Err(Error::NotFound)
    );
}

#[test]
fn implants_apply_and_retract() {
    setup();
    let mut ctx = Context::new();
    ctx.set_ship(TYPE_DOMINIX);
    ctx.add_drone(TYPE_GARDE_II, 1);
    assert_eq!(
        ctx.drone_attribute(TYPE_GARDE_II, ATT_ARMOR_HP).unwrap(),
        1800.0
    );

    let key = ctx.add_implant(TYPE_DD_603_IMPLANT);
    assert_eq!(
        ctx.drone_attribute(TYPE_GARDE_II, ATT_ARMOR_HP).unwrap(),
        1800.0 * 1.03
    );

    ctx.remove_implant(key).unwrap();
    assert_eq!(
        ctx.drone_attribute(TYPE_GARDE_II, ATT_ARMOR_HP).unwrap(),
        1800.0
    );
    assert_eq!(ctx.remove_implant(key), Err(Error::NotFound));
}

#[test]
fn unshipping_keeps_modules_with_their_state() {
    setup();
    let mut ctx = Context::new();
    ctx.set_ship(TYPE_DOMINIX);
    let slot = ctx.add_module(TYPE_OMNI_TRACKING_LINK_II);
    ctx.set_module_state(slot, State::Online).unwrap();
    ctx.add_drone(TYPE_GARDE_II, 1);
    let boosted = ctx.drone_attribute(TYPE_GARDE_II, ATT_MAX_RANGE).unwrap();

    ctx.set_ship(0);
    // The hull is gone but the fitted module still tracks for the drone.
    assert_eq!(
        boosted.to_bits(),
        ctx.drone_attribute(TYPE_GARDE_II, ATT_MAX_RANGE)
            .unwrap()
            .to_bits()
    );
    assert_eq!(ctx.ship_attribute(ATT_ARMOR_HP).unwrap(), 0.0);

    ctx.set_ship(TYPE_DOMINIX);
    assert_eq!(ctx.ship_attribute(ATT_ARMOR_HP).unwrap(), 9000.0);
}

#[test]
fn module_attribute_by_location_matches_direct_getter() {
    setup();
    let mut ctx = Context::new();
    ctx.set_ship(TYPE_DOMINIX);
    let slot = ctx.add_module(TYPE_RAILGUN_II);
    let via_location = ctx
        .location_attribute(dogma::Location::Module { index: slot }, ATT_MAX_RANGE)
        .unwrap();
    let via_getter = ctx.module_attribute(slot, ATT_MAX_RANGE).unwrap();
    assert_eq!(via_location.to_bits(), via_getter.to_bits());
}
