//! TX signal construction and radiation into the satellite field (§4.3.7).

use ew_types::{AntennaConfig, AntennaState, Dbm, Hz, Polarization, RfSignal};

use crate::antenna::physics;
use crate::constants::{BORESIGHT_TOLERANCE_DEG, TX_IF_TO_RF_UPCONVERT_HZ};
use crate::manager::SimulationManager;

/// Composes the outbound carrier for one OMT-presented `sig`: upconverts IF
/// to RF, folds in polarization mismatch loss, feed loss, and peak gain; the
/// result is unicast to every satellite `sats_by_az_el` returns, unless the
/// antenna is in loopback.
pub fn radiate(
    sig: &RfSignal,
    state: &AntennaState,
    config: &AntennaConfig,
    antenna_circular_handedness: Polarization,
    manager: &mut SimulationManager,
) {
    let rf_freq = Hz(sig.frequency.value() + TX_IF_TO_RF_UPCONVERT_HZ);

    let l_pol = physics::polarization_mismatch_loss_db(
        config.pol_type,
        state.polarization,
        antenna_circular_handedness,
        config.xpd_db,
        sig.polarization,
        sig.rotation,
    );
    let l_feed = config.feed_loss.loss_db(rf_freq);
    let g_max = physics::peak_gain_dbi(rf_freq, config);

    let p_tx = sig.power.value() - l_pol.value() - l_feed.value() + g_max.value();
    let outbound = sig.with_frequency(rf_freq).with_power(Dbm(p_tx));

    if state.is_loopback {
        return;
    }

    let targets: Vec<u32> = manager
        .satellites()
        .filter(|sat| {
            (sat.az.value() - state.azimuth.value()).abs() <= BORESIGHT_TOLERANCE_DEG
                && (sat.el.value() - state.elevation.value()).abs() <= BORESIGHT_TOLERANCE_DEG
        })
        .map(|sat| sat.norad_id)
        .collect();

    for norad_id in targets {
        manager.add_signal(norad_id, outbound.clone());
    }
}
