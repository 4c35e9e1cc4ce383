//! End-to-end drone scenarios. Expected values cross-checked against Pyfa
//! (June 2013 data): all skills at V unless overridden.

use dogma::{Context, Error, State};

const TYPE_DOMINIX: u32 = 645;
const TYPE_SCORPION: u32 = 640;
const TYPE_GARDE_II: u32 = 28211;
const TYPE_HORNET_EC300: u32 = 23707;
const TYPE_LARGE_SDA: u32 = 25920;
const TYPE_DRONE_DAMAGE_AMP_II: u32 = 4405;
const TYPE_OMNI_TRACKING_LINK_II: u32 = 24438;
const TYPE_SIG_DISTORTION_AMP_II: u32 = 25563;
const TYPE_ECM_PHASE_INVERTER_II: u32 = 2559;

const ATT_MAX_RANGE: u16 = 54;
const ATT_DAMAGE_MULTIPLIER: u16 = 64;
const ATT_TRACKING_SPEED: u16 = 160;
const ATT_SCAN_LADAR_STRENGTH_BONUS: u16 = 239;
const ATT_ARMOR_HP: u16 = 265;

fn setup() {
    dogma::init().expect("catalogue pack required for drone tests");
}

fn approx_eq(a: f64, b: f64, tol: f64) {
    assert!((a - b).abs() <= tol, "expected {b}, got {a}");
}

#[test]
fn unlaunched_drone_attribute_is_not_found() {
    setup();
    let mut ctx = Context::new();
    ctx.set_ship(TYPE_DOMINIX);
    assert_eq!(
        ctx.drone_attribute(TYPE_GARDE_II, ATT_ARMOR_HP),
        Err(Error::NotFound)
    );
}

#[test]
fn launched_garde_armor_includes_skill_bonuses() {
    setup();
    let mut ctx = Context::new();
    ctx.set_ship(TYPE_DOMINIX);
    ctx.add_drone(TYPE_GARDE_II, 2);
    let armor = ctx.drone_attribute(TYPE_GARDE_II, ATT_ARMOR_HP).unwrap();
    approx_eq(armor, 1800.0, 0.05);
}

#[test]
fn partial_removal_keeps_attributes_until_the_last_drone() {
    setup();
    let mut ctx = Context::new();
    ctx.set_ship(TYPE_DOMINIX);
    ctx.add_drone(TYPE_GARDE_II, 2);

    ctx.remove_drone_partial(TYPE_GARDE_II, 1);
    let armor = ctx.drone_attribute(TYPE_GARDE_II, ATT_ARMOR_HP).unwrap();
    approx_eq(armor, 1800.0, 0.05);

    ctx.remove_drone_partial(TYPE_GARDE_II, 1);
    assert_eq!(
        ctx.drone_attribute(TYPE_GARDE_II, ATT_ARMOR_HP),
        Err(Error::NotFound)
    );
}

#[test]
fn removal_underflow_equals_full_removal() {
    setup();
    let mut ctx = Context::new();
    ctx.set_ship(TYPE_DOMINIX);

    ctx.add_drone(TYPE_GARDE_II, 5);
    ctx.remove_drone_partial(TYPE_GARDE_II, 10);
    assert_eq!(
        ctx.drone_attribute(TYPE_GARDE_II, ATT_ARMOR_HP),
        Err(Error::NotFound)
    );

    ctx.add_drone(TYPE_GARDE_II, 10);
    ctx.remove_drone(TYPE_GARDE_II);
    assert_eq!(
        ctx.drone_attribute(TYPE_GARDE_II, ATT_ARMOR_HP),
        Err(Error::NotFound)
    );
}

#[test]
fn drone_support_modules_stack_onto_the_drone() {
    setup();
    let mut ctx = Context::new();
    ctx.set_ship(TYPE_DOMINIX);
    ctx.add_drone(TYPE_GARDE_II, 1);

    // Skills alone.
    approx_eq(
        ctx.drone_attribute(TYPE_GARDE_II, ATT_MAX_RANGE).unwrap(),
        45000.0,
        0.05,
    );
    approx_eq(
        ctx.drone_attribute(TYPE_GARDE_II, ATT_TRACKING_SPEED).unwrap(),
        0.054,
        0.0005,
    );

    let slot0 = ctx.add_module(TYPE_LARGE_SDA);
    let slot1 = ctx.add_module(TYPE_DRONE_DAMAGE_AMP_II);
    let slot2 = ctx.add_module(TYPE_OMNI_TRACKING_LINK_II);
    ctx.set_module_state(slot0, State::Online).unwrap();
    ctx.set_module_state(slot1, State::Online).unwrap();
    ctx.set_module_state(slot2, State::Online).unwrap();

    approx_eq(
        ctx.drone_attribute(TYPE_GARDE_II, ATT_MAX_RANGE).unwrap(),
        56250.0,
        0.05,
    );
    approx_eq(
        ctx.drone_attribute(TYPE_GARDE_II, ATT_TRACKING_SPEED).unwrap(),
        0.0675,
        0.00005,
    );
    // Both damage modules are stacking-penalized against each other; the
    // skill bonus applies in full.
    approx_eq(
        ctx.drone_attribute(TYPE_GARDE_II, ATT_DAMAGE_MULTIPLIER).unwrap(),
        9.625692655,
        0.0000000005,
    );
}

#[test]
fn ship_scoped_ecm_bonuses_do_not_reach_the_drone() {
    setup();
    let mut ctx = Context::new();
    ctx.set_ship(TYPE_SCORPION);
    ctx.add_drone(TYPE_HORNET_EC300, 1);
    let slot0 = ctx.add_module(TYPE_SIG_DISTORTION_AMP_II);
    let slot1 = ctx.add_module(TYPE_ECM_PHASE_INVERTER_II);
    ctx.set_module_state(slot0, State::Online).unwrap();
    ctx.set_module_state(slot1, State::Active).unwrap();

    // The amplifier targets ECM modules on the ship; the drone hangs off
    // the character and must keep its base strength bonus.
    approx_eq(
        ctx.drone_attribute(TYPE_HORNET_EC300, ATT_SCAN_LADAR_STRENGTH_BONUS)
            .unwrap(),
        1.0,
        0.05,
    );
    approx_eq(
        ctx.module_attribute(slot1, ATT_SCAN_LADAR_STRENGTH_BONUS).unwrap(),
        8.6625,
        0.00005,
    );
}

#[test]
fn drone_attributes_are_independent_of_stacked_quantity() {
    setup();
    let mut ctx = Context::new();
    ctx.set_ship(TYPE_DOMINIX);
    ctx.add_drone(TYPE_GARDE_II, 1);
    let single = ctx.drone_attribute(TYPE_GARDE_II, ATT_ARMOR_HP).unwrap();
    ctx.add_drone(TYPE_GARDE_II, 4);
    let stacked = ctx.drone_attribute(TYPE_GARDE_II, ATT_ARMOR_HP).unwrap();
    assert_eq!(single, stacked);
}
