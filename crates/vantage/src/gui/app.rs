use crate::config;
use crate::events::AppEvent;
use crate::gui::dial::{self, CANVAS_SIZE};
use crate::gui::theme::{self, ThemeColors};
use crate::sys::responses::ResponseLog;
use bearing::Point;
use bearing::dial::{Dial, DialAction, DialError};
use bearing::session::{Session, SessionError};
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

const NO_SELECTION_PROMPT: &str = "Drag the line to set your input.";
const FINISHED_TEXT: &str = "All tasks completed. Thank you!";

pub struct AppInit {
    pub session: Session,
    pub dial: Dial,
    pub responses: ResponseLog,
    pub events: async_channel::Receiver<AppEvent>,
}

pub struct AppModel {
    pub dial: Rc<RefCell<Dial>>,
    pub session: Session,
    pub responses: ResponseLog,
    pub prompt: String,
    pub status: String,
    pub drawing_area: gtk::DrawingArea,
}

#[derive(Debug)]
pub enum AppMsg {
    PointerDown(Point),
    PointerMove(Point),
    PointerUp,
    PointerLeave,
    CanvasResized(i32, i32),
    Submit,
    ConfigReload,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

impl AppModel {
    fn button_label(&self) -> &'static str {
        match self.session.current() {
            Some(trial) if trial.showcase => "Continue",
            Some(_) => "Submit",
            None => "Done",
        }
    }

    fn progress_text(&self) -> String {
        if self.session.is_finished() {
            return String::new();
        }
        let (position, total) = self.session.progress();
        format!("Trial {position} of {total}")
    }

    fn load_current(&mut self) -> DialAction {
        match self.session.current() {
            Some(trial) => {
                self.prompt = trial.prompt();
                self.dial.borrow_mut().load_trial(trial)
            }
            None => {
                self.prompt = FINISHED_TEXT.to_string();
                self.dial.borrow_mut().clear()
            }
        }
    }

    fn submit(&mut self) -> DialAction {
        let result = self.session.submit(&self.dial.borrow());
        match result {
            Ok(Some(response)) => {
                if let Err(e) = self.responses.append(&response) {
                    log::error!(
                        "Failed to record response in {}: {}",
                        self.responses.path().display(),
                        e
                    );
                }
            }
            Ok(None) => {}
            Err(SessionError::Dial(DialError::NoSelection)) => {
                log::warn!("Submit without a selection");
                self.status = NO_SELECTION_PROMPT.to_string();
                return DialAction::none();
            }
            Err(e) => {
                log::warn!("Submit rejected: {}", e);
                return DialAction::none();
            }
        }
        self.status.clear();
        self.load_current()
    }

    fn reload_config(&mut self) -> DialAction {
        let new_config = match config::load_config() {
            Ok(c) => c,
            Err(e) => {
                log::error!("Failed to reload config: {}", e);
                return DialAction::none();
            }
        };

        let mut dial = self.dial.borrow_mut();
        dial.set_mode(new_config.dial.mode);
        dial.set_label_offset(new_config.dial.label_offset);
        let action = match dial.resize(new_config.dial.radius) {
            Ok(action) => action,
            Err(e) => {
                log::warn!("Keeping current radius: {}", e);
                DialAction::redraw()
            }
        };
        log::info!("Configuration reloaded");
        action
    }
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = AppInit;
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            set_title: Some("Vantage"),
            set_default_width: CANVAS_SIZE + 80,
            set_default_height: CANVAS_SIZE + 200,

            gtk::Box {
                set_orientation: gtk::Orientation::Vertical,
                set_spacing: 8,
                set_margin_all: 16,

                gtk::Label {
                    #[watch]
                    set_label: &model.progress_text(),
                    add_css_class: "dim-label",
                },

                gtk::Label {
                    #[watch]
                    set_label: &model.prompt,
                    set_wrap: true,
                    set_justify: gtk::Justification::Center,
                    add_css_class: "vantage-prompt",
                },

                #[name = "drawing_area"]
                gtk::DrawingArea {
                    set_hexpand: true,
                    set_vexpand: true,
                    set_content_width: CANVAS_SIZE,
                    set_content_height: CANVAS_SIZE,

                    connect_resize[sender] => move |_, width, height| {
                        sender.input(AppMsg::CanvasResized(width, height));
                    },

                    add_controller = gtk::GestureDrag {
                        set_button: 1, // primary only
                        connect_drag_begin[sender] => move |_, x, y| {
                            sender.input(AppMsg::PointerDown(Point::new(x, y)));
                        },
                        connect_drag_update[sender] => move |gesture, dx, dy| {
                            if let Some((x, y)) = gesture.start_point() {
                                sender.input(AppMsg::PointerMove(Point::new(x + dx, y + dy)));
                            }
                        },
                        connect_drag_end[sender] => move |_, _, _| {
                            sender.input(AppMsg::PointerUp);
                        }
                    },

                    add_controller = gtk::EventControllerMotion {
                        connect_leave[sender] => move |_| {
                            sender.input(AppMsg::PointerLeave);
                        }
                    }
                },

                gtk::Label {
                    #[watch]
                    set_label: &model.status,
                    add_css_class: "vantage-status",
                },

                gtk::Button {
                    #[watch]
                    set_label: model.button_label(),
                    #[watch]
                    set_sensitive: !model.session.is_finished(),
                    set_halign: gtk::Align::Center,
                    connect_clicked => AppMsg::Submit,
                }
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let AppInit {
            session,
            dial,
            responses,
            events,
        } = init;

        theme::load_css();

        let mut model = AppModel {
            dial: Rc::new(RefCell::new(dial)),
            session,
            responses,
            prompt: String::new(),
            status: String::new(),
            drawing_area: gtk::DrawingArea::default(),
        };
        model.load_current();

        let widgets = view_output!();

        model.drawing_area = widgets.drawing_area.clone();

        let dial_draw = model.dial.clone();
        widgets
            .drawing_area
            .set_draw_func(move |drawing_area, cr, _, _| {
                let style_context = drawing_area.style_context();
                let colors = ThemeColors::from_context(&style_context);
                if let Err(e) = dial::draw(cr, &dial_draw.borrow().scene(), &colors) {
                    log::error!("Drawing error: {}", e);
                }
            });

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = events.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, _sender: ComponentSender<Self>) {
        let action = match msg {
            AppMsg::PointerDown(point) => {
                let action = self.dial.borrow_mut().pointer_down(point);
                if self.dial.borrow().is_dragging() {
                    self.status.clear();
                }
                action
            }
            AppMsg::PointerMove(point) => self.dial.borrow_mut().pointer_move(point),
            AppMsg::PointerUp => self.dial.borrow_mut().pointer_up(),
            AppMsg::PointerLeave => self.dial.borrow_mut().pointer_leave(),
            AppMsg::CanvasResized(width, height) => {
                let center = Point::new(width as f64 / 2.0, height as f64 / 2.0);
                self.dial.borrow_mut().set_center(center)
            }
            AppMsg::Submit => self.submit(),
            AppMsg::ConfigReload => self.reload_config(),
        };

        if action.should_redraw {
            self.drawing_area.queue_draw();
        }
    }
}
