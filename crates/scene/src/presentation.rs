//! Drives a [`Presentation`] against a live network.

use catalog::CountryCatalog;
use foundation::time::Millis;
use runtime::presentation::{Presentation, Speed, Step};
use tracing::{info, warn};

use crate::network::DeliveryNetwork;

/// Prepares the network and starts a presentation.
///
/// Countries the catalog cannot locate are left out. The network is cleared
/// (the origin stays) and label visibility is set to `show_labels`. Returns
/// `None` when there is no origin or nothing to present.
pub fn start_presentation(
    network: &mut DeliveryNetwork,
    catalog: &CountryCatalog,
    countries: impl IntoIterator<Item = String>,
    speed: Speed,
    show_labels: bool,
    now: Millis,
) -> Option<Presentation> {
    if network.origin().is_none() {
        warn!("presentation needs an origin");
        return None;
    }
    let (known, unknown): (Vec<String>, Vec<String>) = countries
        .into_iter()
        .partition(|c| catalog.coords(c).is_some());
    if !unknown.is_empty() {
        warn!(?unknown, "no coordinates for some countries");
    }

    let presentation = Presentation::start(known, speed, now)?;
    network.set_label_visibility(show_labels);
    network.clear();
    Some(presentation)
}

/// Advances the presentation and applies the resulting step.
pub fn run_presentation_step(
    presentation: &mut Presentation,
    network: &mut DeliveryNetwork,
    catalog: &CountryCatalog,
    now: Millis,
) -> Step {
    let step = presentation.tick(now);
    match &step {
        Step::Add(name) => match catalog.coords(name) {
            Some(point) => {
                if network.add_destination(name, point) && network.labels_visible() {
                    network.reorganize_all_labels();
                }
            }
            None => warn!(country = %name, "no coordinates, skipping"),
        },
        Step::Finished => {
            let progress = presentation.progress();
            info!(added = progress.added, "presentation complete");
        }
        Step::Idle | Step::Stopped => {}
    }
    step
}

#[cfg(test)]
mod tests {
    use super::*;
    use runtime::presentation::PresentationState;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn presents_known_countries_in_order() {
        let catalog = CountryCatalog::embedded();
        let mut net = DeliveryNetwork::default();
        net.set_origin("Latvia", catalog.coords("Latvia").unwrap());
        net.add_destination("Japan", catalog.coords("Japan").unwrap());

        let mut p = start_presentation(
            &mut net,
            &catalog,
            names(&["Spain", "Atlantis", "Estonia"]),
            Speed::Fast,
            true,
            Millis(0),
        )
        .unwrap();
        assert!(net.destinations().is_empty());
        assert!(net.labels_visible());
        assert_eq!(p.countries(), &names(&["Estonia", "Spain"])[..]);

        assert_eq!(
            run_presentation_step(&mut p, &mut net, &catalog, Millis(0)),
            Step::Add("Estonia".into())
        );
        assert_eq!(
            run_presentation_step(&mut p, &mut net, &catalog, Millis(100)),
            Step::Idle
        );
        assert_eq!(
            run_presentation_step(&mut p, &mut net, &catalog, Millis(800)),
            Step::Add("Spain".into())
        );
        assert_eq!(
            run_presentation_step(&mut p, &mut net, &catalog, Millis(1600)),
            Step::Finished
        );
        assert_eq!(p.state(), PresentationState::Finished);
        assert_eq!(net.destination_ids(), vec!["Estonia", "Spain"]);
        assert_eq!(net.labels().len(), 2);
        assert_eq!(p.progress().coverage_percent, 100);
    }

    #[test]
    fn needs_origin_and_known_countries() {
        let catalog = CountryCatalog::embedded();
        let mut net = DeliveryNetwork::default();
        let none = start_presentation(
            &mut net,
            &catalog,
            names(&["Spain"]),
            Speed::Slow,
            false,
            Millis(0),
        );
        assert!(none.is_none());

        net.set_origin("Latvia", catalog.coords("Latvia").unwrap());
        let none = start_presentation(
            &mut net,
            &catalog,
            names(&["Atlantis"]),
            Speed::Slow,
            false,
            Millis(0),
        );
        assert!(none.is_none());
    }
}
