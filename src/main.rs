use iced::widget::image::Handle;
use iced::widget::{button, column, container, row, text, text_input};
use iced::{window, Alignment, Element, Length, Size, Subscription, Task, Theme};
use log::{debug, info, warn};
use rfd::FileDialog;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use photo_grid::render::{InteractionHook, LayoutRenderer, HtmlSurface};
use photo_grid::source::{self, PrivateAlbum, RemoteGallery};
use photo_grid::state::{ImageRef, LayoutSession, Manifest, PopulationTicket, Progress};
use photo_grid::viewport::{self, ResizeTicket, ViewportReactor};
use photo_grid::{
    DimensionProbe, GalleryConfig, LayoutSkip, ProbeOutput, RenderMode, RenderOptions,
};

// Declare the ui module
mod ui;

use ui::GridSurface;

/// Initial window size
const INITIAL_WIDTH: f32 = 1200.0;
const INITIAL_HEIGHT: f32 = 800.0;

/// Padding around the window content
const PADDING: f32 = 20.0;

/// Main application state
struct PhotoGrid {
    /// Probes image dimensions for every population
    probe: DimensionProbe,
    /// Private gallery backend
    remote: RemoteGallery,
    /// Record set, row size and population lifecycle
    session: LayoutSession,
    /// Writes rows into the grid surface
    renderer: LayoutRenderer<GridSurface>,
    /// Turns window resizes into debounced re-layouts
    reactor: ViewportReactor,
    /// Decoded-once image data, keyed by url
    handles: HashMap<String, Handle>,
    /// Album name typed by the user
    album_name: String,
    /// A private gallery request is in flight
    verifying: bool,
    /// Inline message under the album form
    error: Option<String>,
    /// Status message to display to the user
    status: String,
    /// Probes that fell back to a square tile in the current population
    failed_probes: usize,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// User clicked the "Open Folder" button
    OpenFolder,
    /// Background folder scan finished
    FolderScanned(Result<Vec<ImageRef>, String>),
    /// Album name input changed
    AlbumNameChanged(String),
    /// User submitted the album form
    SubmitAlbum,
    /// The private gallery backend answered
    AlbumLoaded(Result<PrivateAlbum, String>),
    /// One probe of a population resolved
    Probed(PopulationTicket, usize, ProbeOutput),
    /// Every probe of a batch population resolved
    BatchProbed(PopulationTicket, Vec<ProbeOutput>),
    /// The window changed size
    WindowResized(Size),
    /// A resize quiet period is over
    ResizeSettled(ResizeTicket),
    /// User clicked a tile that carries a click action (name, action)
    TileActivated(String, String),
}

/// Tells the interaction layer the tiles changed
struct RebindInteractions;

impl InteractionHook for RebindInteractions {
    fn tiles_changed(&mut self, tile_count: usize, is_private: bool) {
        debug!(
            "Rebinding interactions for {} tiles (private: {})",
            tile_count, is_private
        );
    }
}

impl PhotoGrid {
    /// Create a new instance of the application
    fn new(config: GalleryConfig, start_dir: Option<PathBuf>) -> (Self, Task<Message>) {
        let remote =
            RemoteGallery::with_timeout(config.backend_url.clone(), config.request_timeout())
                .unwrap_or_else(|e| {
                    warn!("⚠️  Falling back to a default HTTP client: {}", e);
                    RemoteGallery::new(reqwest::Client::new(), config.backend_url.clone())
                });

        let mut reactor = ViewportReactor::new(INITIAL_WIDTH - 2.0 * PADDING);
        reactor.install();

        let app = PhotoGrid {
            probe: DimensionProbe::with_url_fetcher(reqwest::Client::new()),
            remote,
            session: LayoutSession::new(reactor.images_per_row()),
            renderer: LayoutRenderer::new(GridSurface::default())
                .with_hook(Box::new(RebindInteractions)),
            reactor,
            handles: HashMap::new(),
            album_name: String::new(),
            verifying: false,
            error: None,
            status: "Ready. Open a folder to start.".to_string(),
            failed_probes: 0,
        };

        info!("🎨 Photo Grid initialized");

        // Open the start-up gallery right away
        let task = match start_dir.or(config.gallery_dir) {
            Some(folder) => scan(folder),
            None => Task::none(),
        };

        (app, task)
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::OpenFolder => {
                // Show the native folder picker dialog
                let folder = FileDialog::new()
                    .set_title("Select Folder with Photos")
                    .pick_folder();

                if let Some(folder_path) = folder {
                    self.status = format!("Scanning {}...", folder_path.display());
                    return scan(folder_path);
                }

                Task::none()
            }
            Message::FolderScanned(Ok(refs)) => {
                self.populate(refs, None, RenderOptions::public())
            }
            Message::FolderScanned(Err(message)) => {
                warn!("⚠️  {}", message);
                self.status = message;
                Task::none()
            }
            Message::AlbumNameChanged(name) => {
                self.album_name = name;
                Task::none()
            }
            Message::SubmitAlbum => {
                if self.verifying {
                    return Task::none();
                }

                self.verifying = true;
                self.error = None;

                let remote = self.remote.clone();
                let album_name = self.album_name.clone();
                Task::perform(
                    async move {
                        remote
                            .fetch_album(&album_name)
                            .await
                            .map_err(|e| e.user_message())
                    },
                    Message::AlbumLoaded,
                )
            }
            Message::AlbumLoaded(Ok(album)) => {
                self.verifying = false;
                let refs = album.image_refs();
                self.populate(refs, album.manifest, RenderOptions::private())
            }
            Message::AlbumLoaded(Err(message)) => {
                self.verifying = false;
                warn!("⚠️  Private gallery unavailable: {}", message);
                self.error = Some(message);
                Task::none()
            }
            Message::Probed(ticket, slot, output) => {
                if self.session.is_current(ticket) {
                    self.remember(&output);
                }
                if let Some(progress) = self.session.resolve(ticket, slot, output.record) {
                    self.apply(progress);
                }
                Task::none()
            }
            Message::BatchProbed(ticket, outputs) => {
                if !self.session.is_current(ticket) {
                    return Task::none();
                }

                outputs.iter().for_each(|output| self.remember(output));
                let records = outputs.into_iter().map(|output| output.record).collect();
                if let Some(progress) = self.session.complete(ticket, records) {
                    self.apply(progress);
                }
                Task::none()
            }
            Message::WindowResized(size) => {
                match self.reactor.on_resize(size.width - 2.0 * PADDING) {
                    Some(ticket) => {
                        Task::perform(ViewportReactor::quiet_period(ticket), Message::ResizeSettled)
                    }
                    None => Task::none(),
                }
            }
            Message::TileActivated(name, action) => {
                info!("🖱️  {} activated: {}", name, action);
                self.status = format!("{} ({})", name, action);
                Task::none()
            }
            Message::ResizeSettled(ticket) => {
                if let Some(width) = self.reactor.settle(ticket) {
                    if let Some(rows) = self.session.relayout(viewport::images_per_row(width)) {
                        debug!("Re-layout at width {}", width);
                        let _ = self.renderer.render_full(&rows, self.session.options());
                    }
                }
                Task::none()
            }
        }
    }

    /// Start a new population and launch its probes
    fn populate(
        &mut self,
        refs: Vec<ImageRef>,
        manifest: Option<Manifest>,
        options: RenderOptions,
    ) -> Task<Message> {
        let (ticket, ordered) = match self.session.begin(refs, manifest.as_ref(), options) {
            Ok(started) => started,
            Err(skip) => {
                self.status = format!("Nothing to show: {}.", skip);
                return Task::none();
            }
        };

        self.handles.clear();
        self.failed_probes = 0;
        if self.renderer.reset().is_err() {
            return Task::none();
        }
        self.status = format!("Loading {} images...", ordered.len());

        match options.mode {
            // One task per image, rows appear as they resolve
            RenderMode::Incremental => {
                let probes = ordered.into_iter().enumerate().map(|(slot, reference)| {
                    Task::perform(self.probe.probe_one(reference), move |output| {
                        Message::Probed(ticket, slot, output)
                    })
                });
                Task::batch(probes)
            }
            // Wait for the whole batch, then render once
            RenderMode::Batch => {
                let probe = self.probe.clone();
                Task::perform(async move { probe.probe_all(ordered).await }, move |outputs| {
                    Message::BatchProbed(ticket, outputs)
                })
            }
        }
    }

    /// Keep the fetched bytes so tiles can be drawn without another download
    fn remember(&mut self, output: &ProbeOutput) {
        match &output.data {
            Some(data) => {
                self.handles.insert(
                    output.record.reference.url.clone(),
                    Handle::from_bytes(data.clone()),
                );
            }
            None => self.failed_probes += 1,
        }
    }

    /// Push population progress to the surface
    fn apply(&mut self, progress: Progress) {
        let options = self.session.options();

        if let Some(rows) = progress.relayout {
            let _ = self.renderer.render_full(&rows, options);
        }
        for row in &progress.append {
            let _ = self.renderer.append_row(row, options);
        }

        if progress.completed {
            self.status = match self.failed_probes {
                0 => format!("{} images.", self.session.records().len()),
                failed => format!(
                    "{} images ({} could not be loaded).",
                    self.session.records().len(),
                    failed
                ),
            };
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let mut header = row![button("Open Folder").on_press(Message::OpenFolder).padding(10)]
            .spacing(10)
            .align_y(Alignment::Center);

        // The album form only makes sense with a backend
        if self.remote.is_configured() {
            let submit_label = if self.verifying { "Verifying..." } else { "View Gallery" };
            header = header
                .push(
                    text_input("Album name", &self.album_name)
                        .on_input(Message::AlbumNameChanged)
                        .on_submit(Message::SubmitAlbum)
                        .padding(10)
                        .width(Length::Fixed(260.0)),
                )
                .push(
                    button(text(submit_label))
                        .on_press_maybe((!self.verifying).then_some(Message::SubmitAlbum))
                        .padding(10),
                );
        }

        let mut content = column![header].spacing(12).padding(PADDING);

        if let Some(error) = &self.error {
            content = content.push(text(error).size(14).style(text::danger));
        }

        let rows = self
            .renderer
            .surface()
            .map(GridSurface::rows)
            .unwrap_or_default();
        content = content
            .push(ui::grid::view(rows, &self.handles, self.reactor.width()))
            .push(text(&self.status).size(14));

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    /// Window resizes drive the re-layout
    fn subscription(&self) -> Subscription<Message> {
        if self.reactor.is_installed() {
            window::resize_events().map(|(_id, size)| Message::WindowResized(size))
        } else {
            Subscription::none()
        }
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

/// Open a folder or gallery page in the background
fn scan(path: PathBuf) -> Task<Message> {
    Task::perform(
        async move {
            source::open_gallery_async(path)
                .await
                .map_err(|e| e.to_string())
        },
        Message::FolderScanned,
    )
}

/// Lay out a folder or gallery page once and print the grid as HTML
fn print_html(path: PathBuf, width: f32) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(html) = render_html(&path, width)? {
        println!("{}", html);
    }
    Ok(())
}

/// The grid container markup, or None when there is nothing to lay out
fn render_html(path: &Path, width: f32) -> Result<Option<String>, Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let refs = source::open_gallery(path)?;
    let probe = DimensionProbe::with_url_fetcher(reqwest::Client::new());

    let mut session = LayoutSession::new(viewport::images_per_row(width));
    let options = RenderOptions {
        is_private: false,
        mode: RenderMode::Batch,
    };
    let (ticket, ordered) = match session.begin(refs, None, options) {
        Ok(started) => started,
        Err(LayoutSkip::EmptySourceSet) => {
            info!("Nothing to lay out in {}", path.display());
            return Ok(None);
        }
        Err(skip) => return Err(skip.into()),
    };

    let outputs = runtime.block_on(probe.probe_all(ordered));
    let records = outputs.into_iter().map(|output| output.record).collect();
    let progress = session.complete(ticket, records).unwrap_or_default();

    let mut renderer = LayoutRenderer::new(HtmlSurface::new());
    renderer.render_full(&progress.relayout.unwrap_or_default(), options)?;
    Ok(renderer.surface().map(HtmlSurface::to_html))
}

fn main() -> iced::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("photo_grid=info"))
        .format_timestamp(None)
        .init();

    let args: Vec<String> = std::env::args().collect();

    // photo-grid --html <folder|page.html> [width]
    if args.get(1).map(String::as_str) == Some("--html") {
        let Some(path) = args.get(2).map(PathBuf::from) else {
            eprintln!("usage: photo-grid --html <folder|page.html> [width]");
            std::process::exit(2);
        };
        let width = args
            .get(3)
            .and_then(|w| w.parse::<f32>().ok())
            .unwrap_or(INITIAL_WIDTH);

        if let Err(e) = print_html(path, width) {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
        return Ok(());
    }

    let config = GalleryConfig::load();
    let start_dir = args.get(1).map(PathBuf::from).filter(|p| p.exists());

    iced::application("Photo Grid", PhotoGrid::update, PhotoGrid::view)
        .subscription(PhotoGrid::subscription)
        .theme(PhotoGrid::theme)
        .window_size(Size::new(INITIAL_WIDTH, INITIAL_HEIGHT))
        .centered()
        .run_with(move || PhotoGrid::new(config, start_dir))
}
