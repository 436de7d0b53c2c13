#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;

use places_sweep::error::Result;
use places_sweep::model::Place;
use places_sweep::places::{NearbyPage, NearbyQuery, PlacesSource};

/// Replays canned pages in call order and records every request it sees.
/// Once the script runs out it answers with empty, token-less pages.
#[derive(Default)]
pub struct ScriptedSource {
    pages: RefCell<VecDeque<Result<NearbyPage>>>,
    pub calls: RefCell<Vec<(NearbyQuery, Option<String>)>>,
}

impl ScriptedSource {
    pub fn new(pages: Vec<Result<NearbyPage>>) -> Self {
        Self {
            pages: RefCell::new(pages.into()),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl PlacesSource for ScriptedSource {
    fn nearby_page(&self, query: &NearbyQuery, page_token: Option<&str>) -> Result<NearbyPage> {
        self.calls
            .borrow_mut()
            .push((*query, page_token.map(String::from)));
        self.pages
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(NearbyPage::default()))
    }
}

/// Answers every request through a closure; handy for per-cell generated data.
pub struct FnSource<F>(pub F);

impl<F> PlacesSource for FnSource<F>
where
    F: Fn(&NearbyQuery, Option<&str>) -> Result<NearbyPage>,
{
    fn nearby_page(&self, query: &NearbyQuery, page_token: Option<&str>) -> Result<NearbyPage> {
        (self.0)(query, page_token)
    }
}

pub fn page(places: Vec<Place>, token: Option<&str>) -> Result<NearbyPage> {
    Ok(NearbyPage {
        places,
        next_page_token: token.map(String::from),
    })
}

pub fn place(name: &str, lat: f64, lng: f64) -> Place {
    Place::new(name, lat, lng)
}
