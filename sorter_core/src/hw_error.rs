//! Maps `Box<dyn Error>` from the transport boundary to typed `SorterError`.
//!
//! `sorter_traits::Transport` returns `Box<dyn Error + Send + Sync>`; this
//! module converts those to our typed error enum, with an optional
//! feature-gated path for `sorter_hardware::HwError` downcasting.

use crate::error::SorterError;

/// Map a transport-boundary error to a typed `SorterError`.
///
/// Known hardware error types are downcast first, then string heuristics
/// apply.
pub fn map_transport_error(e: &(dyn std::error::Error + 'static)) -> SorterError {
    #[cfg(feature = "hardware-errors")]
    {
        if let Some(hw) = e.downcast_ref::<sorter_hardware::error::HwError>() {
            return match hw {
                sorter_hardware::error::HwError::Rejected { .. }
                | sorter_hardware::error::HwError::ShortWrite { .. } => {
                    SorterError::TransportFault(hw.to_string())
                }
                other => SorterError::Transport(other.to_string()),
            };
        }
    }

    let s = e.to_string();
    let lower = s.to_lowercase();
    if lower.contains("nack") || lower.contains("rejected") {
        SorterError::TransportFault(s)
    } else {
        SorterError::Transport(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_errors_map_to_transport() {
        let e = std::io::Error::other("bus unplugged");
        assert_eq!(
            map_transport_error(&e),
            SorterError::Transport("bus unplugged".into())
        );
    }

    #[test]
    fn nack_text_maps_to_fault() {
        let e = std::io::Error::other("device NACK at 0x02");
        assert!(matches!(
            map_transport_error(&e),
            SorterError::TransportFault(_)
        ));
    }

    #[cfg(feature = "hardware-errors")]
    #[test]
    fn hw_rejection_downcasts_to_fault() {
        let e = sorter_hardware::error::HwError::Rejected { channel: 1 };
        assert!(matches!(
            map_transport_error(&e),
            SorterError::TransportFault(_)
        ));
        let e = sorter_hardware::error::HwError::Bus("arbitration lost".into());
        assert!(matches!(map_transport_error(&e), SorterError::Transport(_)));
    }
}
