use gpui::*;
use gpui_component::{Root, ThemeRegistry};

use ui::app::{ChatAppShell, Quit, WINDOW_TITLE, default_themes_path};
use ui::settings::SettingsStore;

fn main() {
    tracing_subscriber::fmt::init();

    let app = Application::new().with_assets(gpui_component_assets::Assets);

    app.run(|cx| {
        // Must run before any Root is created.
        gpui_component::init(cx);

        let store = SettingsStore::load();
        tracing::info!("settings loaded from {:?}", store.config_path());
        cx.set_global(store);

        // A missing themes directory is fine; built-in themes remain.
        if let Err(err) = ThemeRegistry::watch_dir(default_themes_path(), cx, |cx| {
            cx.update_global::<SettingsStore, _>(|store, _cx| {
                store.reload();
            });
            let settings = cx.global::<SettingsStore>().settings();
            settings.apply_theme(None, cx);
        }) {
            tracing::warn!("failed to watch themes directory: {err}. using default themes");
            let settings = cx.global::<SettingsStore>().settings();
            settings.apply_theme(None, cx);
        }

        cx.on_action(|_: &Quit, cx| {
            cx.quit();
        });
        cx.bind_keys([KeyBinding::new("cmd-q", Quit, None)]);

        cx.spawn(async move |cx| {
            cx.update(|cx| {
                let options = WindowOptions {
                    window_bounds: Some(WindowBounds::Windowed(Bounds::centered(
                        None,
                        size(px(420.), px(760.)),
                        cx,
                    ))),
                    titlebar: Some(TitlebarOptions {
                        title: Some(WINDOW_TITLE.into()),
                        appears_transparent: true,
                        traffic_light_position: Some(point(px(9.), px(9.))),
                    }),
                    #[cfg(any(target_os = "linux", target_os = "freebsd"))]
                    window_decorations: Some(WindowDecorations::Client),
                    #[cfg(not(any(target_os = "linux", target_os = "freebsd")))]
                    window_decorations: None,
                    ..Default::default()
                };

                cx.open_window(options, |window, cx| {
                    window.set_window_title(WINDOW_TITLE);
                    let shell = cx.new(|cx| ChatAppShell::new(window, cx));
                    cx.new(|cx| Root::new(shell, window, cx))
                })
                .expect("failed to open main window");

                cx.activate(true);
            })
        })
        .detach();
    });
}
