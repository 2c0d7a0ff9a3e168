//! Dealer positioning by option type

use serde::{Deserialize, Serialize};

use super::RegimeConfig;
use crate::core::OptionType;
use crate::exposure::ExposureSet;

/// Call vs. put dealer gamma, overall and at the money
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealerPositioning {
    pub call_gamma_exposure: f64,
    pub put_gamma_exposure: f64,
    pub net_gamma_exposure: f64,
    pub atm_call_gamma: f64,
    pub atm_put_gamma: f64,
    pub atm_net_gamma: f64,
    /// |put gamma| / |call gamma|; 0 when there is no call gamma
    pub put_call_gamma_ratio: f64,
}

impl DealerPositioning {
    pub fn from_exposures(set: &ExposureSet, config: &RegimeConfig) -> Self {
        let spot = set.spot();
        let band = spot * config.atm_pct;

        let mut call = 0.0;
        let mut put = 0.0;
        let mut atm_call = 0.0;
        let mut atm_put = 0.0;

        for record in set.canonical_records() {
            let atm = record.strike >= spot - band && record.strike <= spot + band;
            match record.option_type {
                OptionType::Call => {
                    call += record.gamma_exposure;
                    if atm {
                        atm_call += record.gamma_exposure;
                    }
                }
                OptionType::Put => {
                    put += record.gamma_exposure;
                    if atm {
                        atm_put += record.gamma_exposure;
                    }
                }
            }
        }

        let put_call_gamma_ratio = if call != 0.0 {
            f64::abs(put) / f64::abs(call)
        } else {
            0.0
        };

        Self {
            call_gamma_exposure: call,
            put_gamma_exposure: put,
            net_gamma_exposure: call + put,
            atm_call_gamma: atm_call,
            atm_put_gamma: atm_put,
            atm_net_gamma: atm_call + atm_put,
            put_call_gamma_ratio,
        }
    }

    /// Dealers net long gamma
    pub fn is_long_gamma(&self) -> bool {
        self.net_gamma_exposure > 0.0
    }
}
