/// Largest surcharge that still validates a fare component.
pub const MAX_PERMITTED_SURCHARGE: u16 = 25;

const SURCHARGE_TIERS: [(f64, u16); 5] = [(1.05, 5), (1.10, 10), (1.15, 15), (1.20, 20), (1.25, 25)];
const EXCEEDED_SURCHARGE: u16 = 30;

/// Excess mileage surcharge percentage for a TPM/MPM pair.
///
/// Each tier includes its lower bound: a TPM exactly 5% above the MPM pays 5.
pub fn get_ems(total_tpm: u16, total_mpm: u16) -> u16 {
    if total_mpm == 0 || total_tpm <= total_mpm {
        return 0;
    }

    let ratio = f64::from(total_tpm) / f64::from(total_mpm);
    SURCHARGE_TIERS
        .iter()
        .find(|(limit, _)| ratio <= *limit)
        .map_or(EXCEEDED_SURCHARGE, |(_, surcharge)| *surcharge)
}
