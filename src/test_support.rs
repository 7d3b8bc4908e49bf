//! Shared fixtures for the unit tests: a recording collaborator set and
//! editors pre-loaded with a page.

use std::cell::RefCell;
use std::rc::Rc;

use crate::camera::PageViewport;
use crate::collab::{BusEvent, Caret, Collaborators, EventBus, StepsRecorder, TextEditor, TextTarget};
use crate::config::EngineConfig;
use crate::doc::{Design, Layer, Page};
use crate::geometry::Point;
use crate::store::Editor;

pub(crate) const PAGE_SIZE: f64 = 1080.0;

#[derive(Debug, Default)]
pub(crate) struct Log {
    pub events: Vec<BusEvent>,
    pub focus: Vec<(TextTarget, Caret)>,
    pub select_all: Vec<TextTarget>,
    pub steps: usize,
}

/// Collaborator that writes everything it receives into a shared [`Log`].
#[derive(Debug, Clone, Default)]
pub(crate) struct Recorder(pub Rc<RefCell<Log>>);

impl Recorder {
    pub fn events(&self) -> Vec<BusEvent> {
        self.0.borrow().events.clone()
    }

    pub fn steps(&self) -> usize {
        self.0.borrow().steps
    }

    pub fn focus(&self) -> Vec<(TextTarget, Caret)> {
        self.0.borrow().focus.clone()
    }

    pub fn selected_all(&self) -> Vec<TextTarget> {
        self.0.borrow().select_all.clone()
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators { bus: Box::new(self.clone()), text: Box::new(self.clone()), steps: Box::new(self.clone()) }
    }
}

impl EventBus for Recorder {
    fn emit(&mut self, event: BusEvent) {
        self.0.borrow_mut().events.push(event);
    }
}

impl TextEditor for Recorder {
    fn focus(&mut self, target: TextTarget, caret: Caret) {
        self.0.borrow_mut().focus.push((target, caret));
    }

    fn select_all(&mut self, target: TextTarget) {
        self.0.borrow_mut().select_all.push(target);
    }
}

impl StepsRecorder for Recorder {
    fn record(&mut self) {
        self.0.borrow_mut().steps += 1;
    }

    fn async_record(&mut self) {
        self.0.borrow_mut().steps += 1;
    }
}

/// A square page of [`PAGE_SIZE`] holding `layers`.
pub(crate) fn page_with(layers: Vec<Layer>) -> Page {
    let mut page = Page::new(PAGE_SIZE, PAGE_SIZE);
    page.layers = layers;
    page
}

/// One page at the screen origin with zoom 1, so screen and page coordinates
/// coincide.
pub(crate) fn editor_with(layers: Vec<Layer>) -> (Editor, Recorder) {
    editor_with_pages(vec![page_with(layers)])
}

/// Pages laid out left to right with a 100px gap, all at zoom 1.
pub(crate) fn editor_with_pages(pages: Vec<Page>) -> (Editor, Recorder) {
    let recorder = Recorder::default();
    let count = pages.len();
    let mut editor = Editor::with_config(Design { pages }, EngineConfig::default(), recorder.collaborators());
    for i in 0..count {
        #[allow(clippy::cast_precision_loss)]
        let x = i as f64 * (PAGE_SIZE + 100.0);
        editor.set_viewport(i, PageViewport::new(Point::new(x, 0.0), 1.0));
    }
    (editor, recorder)
}
