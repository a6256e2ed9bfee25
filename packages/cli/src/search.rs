//! The `search` command: local lookups with a place-search fallback.

use std::sync::Arc;

use mansion_map_cli_utils::{IndicatifProgress, MultiProgress};
use mansion_map_geocoder::{
    PlaceSearch,
    nominatim::NominatimClient,
    service_registry::nominatim_config,
    session::{SearchOutcome, SearchSession},
    zoom::ZoomLimits,
};
use mansion_map_property::{progress::ProgressCallback as _, search::SearchIndex};
use mansion_map_server::search::{
    LocalSearch, constituency_response, place_response, postcode_search,
};
use mansion_map_server_models::{ApiSearchResponse, SEARCHING_MESSAGE};
use tokio::io::{AsyncBufReadExt as _, BufReader};

use crate::output::{print_lines, search_lines};

fn local(index: &SearchIndex, postcode_mode: bool, query: &str) -> LocalSearch {
    if postcode_mode {
        postcode_search(index, query)
    } else {
        LocalSearch::Done(constituency_response(index, query))
    }
}

fn print_response(response: &ApiSearchResponse) {
    print_lines(&search_lines(response));
}

/// Runs a single query, going to the place search if nothing local
/// matches.
pub async fn once(
    index: &SearchIndex,
    postcode_mode: bool,
    query: &str,
    multi: &MultiProgress,
) -> Result<(), Box<dyn std::error::Error>> {
    match local(index, postcode_mode, query) {
        LocalSearch::Done(response) => print_response(&response),
        LocalSearch::External(query) => {
            let client = NominatimClient::new(reqwest::Client::new(), nominatim_config()?);
            let spinner = IndicatifProgress::spinner(multi, SEARCHING_MESSAGE);
            let outcome = client.search(&query).await;
            spinner.finish(String::new());
            print_response(&place_response(outcome, &query, ZoomLimits::default()));
        }
    }
    Ok(())
}

/// Reads queries from stdin, one per line, as if typed into the search
/// box. Place searches are debounced and each new line supersedes any
/// pending one, so only the latest query's results are printed.
pub async fn interactive(
    index: &SearchIndex,
    postcode_mode: bool,
    multi: &MultiProgress,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = nominatim_config()?;
    let debounce = config.debounce();
    let provider: Arc<dyn PlaceSearch> =
        Arc::new(NominatimClient::new(reqwest::Client::new(), config));
    let session = Arc::new(SearchSession::new(provider, debounce));
    let limits = ZoomLimits::default();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut pending = None;

    while let Some(line) = lines.next_line().await? {
        match local(index, postcode_mode, &line) {
            LocalSearch::Done(response) => {
                session.cancel();
                print_response(&response);
            }
            LocalSearch::External(query) => {
                let session = Arc::clone(&session);
                let spinner = IndicatifProgress::spinner(multi, SEARCHING_MESSAGE);
                pending = Some(tokio::spawn(async move {
                    let outcome = session.search(&query).await;
                    spinner.finish(String::new());
                    let response = match outcome {
                        SearchOutcome::Places(places) => place_response(Ok(places), &query, limits),
                        SearchOutcome::Failed(e) => place_response(Err(e), &query, limits),
                        SearchOutcome::Superseded => {
                            log::debug!("search for {query:?} superseded");
                            return;
                        }
                    };
                    print_response(&response);
                }));
            }
        }
    }

    // Let the last query finish once input ends.
    if let Some(handle) = pending {
        handle.await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constituency_mode_never_goes_external() {
        let index = SearchIndex::default();
        assert_eq!(
            local(&index, false, "nowhere"),
            LocalSearch::Done(ApiSearchResponse::default())
        );
        assert_eq!(
            local(&index, true, "nowhere"),
            LocalSearch::External("nowhere".to_string())
        );
    }
}
