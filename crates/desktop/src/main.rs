mod app;
mod detector_panel;
mod settings;
mod shell;
mod theme;
mod widgets;
mod workers;

use app::App;

fn main() -> iced::Result {
    env_logger::init();

    iced::application(App::new, App::update, App::view)
        .title("Facespot")
        .theme(App::theme)
        .window(iced::window::Settings {
            size: iced::Size::new(500.0, 520.0),
            resizable: false,
            ..Default::default()
        })
        .run()
}
