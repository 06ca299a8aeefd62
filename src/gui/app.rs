use crate::carousel::{Carousel, Deck};
use crate::config::Config;
use crate::events::{InputEvent, Point};
use crate::gui::gallery::Gallery;
use crate::gui::theme::{self, ThemeColors};
use crate::gui::view::{self, Layout};
use crate::gui::window;
use crate::stage::Scene;
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

pub struct AppInit {
    pub deck: Deck,
    pub config: Config,
}

pub struct AppModel {
    pub carousel: Rc<RefCell<Carousel<Scene>>>,
    pub gallery: Rc<Gallery>,
    pub drawing_area: gtk::DrawingArea,
}

#[derive(Debug)]
pub enum AppMsg {
    Input(InputEvent),
    Frame(Duration),
    Resize(i32, i32),
    Quit,
}

impl From<InputEvent> for AppMsg {
    fn from(event: InputEvent) -> Self {
        AppMsg::Input(event)
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
            set_title: Some("Slider"),
            set_default_size: (1280, 800),
            add_css_class: "slider-window",
            set_decorated: false,

            add_controller = gtk::EventControllerKey {
                connect_key_pressed[sender] => move |_, key, _, _| {
                    if key == gtk::gdk::Key::Escape {
                        sender.input(AppMsg::Quit);
                        return glib::Propagation::Stop;
                    }
                    match window::arrow_key(key) {
                        Some(arrow) => {
                            sender.input(AppMsg::Input(InputEvent::Key(arrow)));
                            glib::Propagation::Stop
                        }
                        None => glib::Propagation::Proceed,
                    }
                }
            },

            #[name = "drawing_area"]
            gtk::DrawingArea {
                set_hexpand: true,
                set_vexpand: true,
                add_css_class: "slider-surface",

                connect_resize[sender] => move |_, w, h| {
                    sender.input(AppMsg::Resize(w, h));
                },
                connect_map[sender] => move |_| {
                    sender.input(AppMsg::Input(InputEvent::Visibility { visible: true }));
                },
                connect_unmap[sender] => move |_| {
                    sender.input(AppMsg::Input(InputEvent::Visibility { visible: false }));
                },

                add_controller = gtk::EventControllerMotion {
                    connect_motion[sender] => move |_, x, y| {
                        sender.input(AppMsg::Input(InputEvent::PointerMove(Point::new(x, y))));
                    },
                    connect_leave[sender] => move |_| {
                        sender.input(AppMsg::Input(InputEvent::PointerLeave));
                    }
                }
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let AppInit { deck, config } = init;

        let settings = config.settings(window::prefers_reduced_motion());
        let gallery = Rc::new(Gallery::load(&deck));
        let carousel = Rc::new(RefCell::new(Carousel::new(deck, Scene::new(), settings)));

        let model = AppModel {
            carousel,
            gallery,
            drawing_area: gtk::DrawingArea::default(),
        };

        let widgets = view_output!();
        theme::install(&widgets.drawing_area);

        let mut model = model;
        model.drawing_area = widgets.drawing_area.clone();

        let carousel_draw = model.carousel.clone();
        let gallery_draw = model.gallery.clone();
        widgets
            .drawing_area
            .set_draw_func(move |drawing_area, cr, w, h| {
                let style_context = drawing_area.style_context();
                let colors = ThemeColors::from_context(&style_context);
                let layout = Layout::new(w as f64, h as f64);
                if let Err(e) = view::draw(
                    cr,
                    &carousel_draw.borrow(),
                    &gallery_draw,
                    &layout,
                    &colors,
                ) {
                    log::error!("Drawing error: {}", e);
                }
            });

        let gesture_sender = sender.clone();
        window::attach_gestures(&widgets.drawing_area, move |event| {
            gesture_sender.input(event.into());
        });
        let frame_sender = sender.clone();
        window::start_frame_clock(&widgets.drawing_area, move |dt| {
            frame_sender.input(AppMsg::Frame(dt));
        });

        root.fullscreen();

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, _sender: ComponentSender<Self>) {
        match msg {
            AppMsg::Input(event) => {
                self.carousel.borrow_mut().handle(event);
                self.drawing_area.queue_draw();
            }
            AppMsg::Frame(dt) => {
                if self.carousel.borrow_mut().advance(dt) {
                    self.drawing_area.queue_draw();
                }
            }
            AppMsg::Resize(w, h) => {
                let layout = Layout::new(w as f64, h as f64);
                let mut carousel = self.carousel.borrow_mut();
                let regions = carousel.regions();
                let stage = carousel.stage_mut();
                stage.set_extent(regions.track, layout.track_height);
                stage.set_extent(regions.title, layout.title_height);
                carousel.handle(InputEvent::Resize);
                log::debug!("Surface resized to {}x{}", w, h);
                self.drawing_area.queue_draw();
            }
            AppMsg::Quit => relm4::main_application().quit(),
        }
    }
}
