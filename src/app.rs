use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use ratatui::prelude::*;
use std::path::PathBuf;
use std::time::Duration;

use crate::card::raster::{Rasterizer, SvgRasterizer};
use crate::card::{BORDER_PALETTE, BORDER_WIDTH_MAX, BORDER_WIDTH_MIN};
use crate::config::Config;
use crate::ingest::{self, PendingIngest};
use crate::maker::MakerSession;
use crate::model::{PhotoTransform, DEFAULT_CATEGORY_ID};
use crate::store::Store;
use crate::theme::{Rgb, Theme};
use crate::ui;
use crate::ui::confirm_dialog::{ConfirmDialog, PendingAction};
use crate::ui::input_dialog::{InputDialog, InputPurpose};
use crate::ui::maker::MakerPreview;
use crate::ui::theme_dialog::ThemeDialog;
use crate::ui::thumbs::ThumbCache;

/// Which screen fills the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Home,
    Gallery,
    Maker,
}

/// Modal state layered over the current view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Normal,
    Lightbox,
    Confirming,
    TextEntry,
    ThemePicker,
    Help,
}

pub struct App {
    pub config: Config,
    pub store: Store,
    pub theme: Theme,
    pub view: View,
    pub mode: AppMode,
    pub should_quit: bool,
    pub status_message: Option<String>,
    // Home: index over category tiles plus the trailing create tile
    pub home_selected: usize,
    // Gallery state, valid while a category is open
    pub current_category: Option<String>,
    pub gallery_selected: usize,
    pub gallery_scroll: usize,
    // Columns from the last render, used for row navigation
    pub gallery_columns: usize,
    pub maker: Option<MakerSession>,
    pub maker_preview: MakerPreview,
    // Preview pane from the last render, used to map mouse motion to tilt
    pub maker_preview_area: Option<Rect>,
    pub rasterizer: Box<dyn Rasterizer>,
    pub thumbs: ThumbCache,
    pub confirm_dialog: Option<ConfirmDialog>,
    pub input_dialog: Option<InputDialog>,
    pub theme_dialog: Option<ThemeDialog>,
    pub pending_imports: Vec<PendingIngest>,
    pub clear_on_next_render: bool,
}

impl App {
    pub fn new(config: Config) -> Self {
        let theme = theme_from_config(&config);
        let thumbs = ThumbCache::new(config.preview.protocol, config.preview.thumbnail_size);
        Self {
            config,
            store: Store::new(),
            theme,
            view: View::Home,
            mode: AppMode::Normal,
            should_quit: false,
            status_message: None,
            home_selected: 0,
            current_category: None,
            gallery_selected: 0,
            gallery_scroll: 0,
            gallery_columns: 3,
            maker: None,
            maker_preview: MakerPreview::new(),
            maker_preview_area: None,
            rasterizer: Box::new(SvgRasterizer::new()),
            thumbs,
            confirm_dialog: None,
            input_dialog: None,
            theme_dialog: None,
            pending_imports: Vec::new(),
            clear_on_next_render: false,
        }
    }

    pub fn run(&mut self, terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>) -> Result<()> {
        while !self.should_quit {
            self.poll_imports();
            self.thumbs.poll();

            terminal.draw(|frame| ui::render(frame, self))?;

            if event::poll(Duration::from_millis(100))? {
                match event::read()? {
                    Event::Key(key) => self.handle_key(key),
                    Event::Mouse(mouse) => self.handle_mouse(mouse),
                    Event::Resize(_, _) => {}
                    _ => {}
                }
            }
        }
        Ok(())
    }

    /// Drain finished background imports into the store. Each batch lands in
    /// the category that was open when the import started.
    pub fn poll_imports(&mut self) {
        let mut landed = 0;
        for pending in &mut self.pending_imports {
            for photo in pending.poll() {
                self.store.add_photo(photo.data_uri, &pending.category_id);
                landed += 1;
            }
        }
        if landed > 0 {
            self.status_message = Some(format!("Imported {} photos", landed));
            self.invalidate_covers();
        }
        self.pending_imports.retain(|p| !p.is_done());
    }

    /// Drop every cached cover thumbnail so the home tiles re-resolve them.
    /// Covers depend on photo order and tags, so any photo or cover change
    /// can move which image a tile shows.
    fn invalidate_covers(&mut self) {
        let keys: Vec<String> = self
            .store
            .categories()
            .iter()
            .map(|c| format!("cover:{}", c.id))
            .collect();
        for key in keys {
            self.thumbs.remove(&key);
        }
    }

    // --- Keyboard dispatch ---

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.mode {
            AppMode::Help => self.handle_help_key(key),
            AppMode::Confirming => self.handle_confirm_key(key),
            AppMode::TextEntry => self.handle_input_key(key),
            AppMode::ThemePicker => self.handle_theme_key(key),
            AppMode::Lightbox => self.handle_lightbox_key(key),
            AppMode::Normal => match self.view {
                View::Home => self.handle_home_key(key),
                View::Gallery => self.handle_gallery_key(key),
                View::Maker => self.handle_maker_key(key),
            },
        }
    }

    fn handle_help_key(&mut self, key: KeyEvent) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            self.mode = AppMode::Normal;
        }
    }

    fn handle_home_key(&mut self, key: KeyEvent) {
        let tile_count = self.store.categories().len() + 1;
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.mode = AppMode::Help,
            KeyCode::Char('t') => {
                self.theme_dialog = Some(ThemeDialog::new());
                self.mode = AppMode::ThemePicker;
            }
            KeyCode::Char('h') | KeyCode::Left => {
                if self.home_selected > 0 {
                    self.home_selected -= 1;
                }
            }
            KeyCode::Char('l') | KeyCode::Right => {
                if self.home_selected + 1 < tile_count {
                    self.home_selected += 1;
                }
            }
            KeyCode::Enter => {
                if self.home_selected == self.store.categories().len() {
                    self.open_input(InputPurpose::NewCategory, "New category", "");
                } else {
                    self.open_gallery();
                }
            }
            KeyCode::Char('n') => {
                self.open_input(InputPurpose::NewCategory, "New category", "");
            }
            KeyCode::Char('r') => self.open_rename_category(),
            KeyCode::Char('c') => self.open_set_cover(),
            KeyCode::Char('d') => self.request_delete_category(),
            _ => {}
        }
    }

    fn handle_gallery_key(&mut self, key: KeyEvent) {
        let count = self.visible_photo_count();
        let columns = self.gallery_columns.max(1);
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.close_gallery(),
            KeyCode::Char('?') => self.mode = AppMode::Help,
            KeyCode::Char('h') | KeyCode::Left => {
                if self.gallery_selected > 0 {
                    self.gallery_selected -= 1;
                }
            }
            KeyCode::Char('l') | KeyCode::Right => {
                if self.gallery_selected + 1 < count {
                    self.gallery_selected += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                if self.gallery_selected >= columns {
                    self.gallery_selected -= columns;
                }
            }
            KeyCode::Char('j') | KeyCode::Down => {
                if self.gallery_selected + columns < count {
                    self.gallery_selected += columns;
                }
            }
            KeyCode::Enter | KeyCode::Char('v') => {
                if count > 0 {
                    self.mode = AppMode::Lightbox;
                }
            }
            KeyCode::Char('i') => {
                self.open_input(InputPurpose::ImportPath, "Import from directory", "");
            }
            KeyCode::Char('m') => self.open_maker(),
            KeyCode::Char('d') => self.request_delete_photo(),
            _ => {}
        }
    }

    fn handle_lightbox_key(&mut self, key: KeyEvent) {
        let count = self.visible_photo_count();
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('v') | KeyCode::Char('q') => {
                self.mode = AppMode::Normal;
            }
            KeyCode::Char('h') | KeyCode::Left => {
                if self.gallery_selected > 0 {
                    self.gallery_selected -= 1;
                }
            }
            KeyCode::Char('l') | KeyCode::Right => {
                if self.gallery_selected + 1 < count {
                    self.gallery_selected += 1;
                }
            }
            KeyCode::Char('m') => self.open_maker(),
            KeyCode::Char('d') => self.request_delete_photo(),
            _ => {}
        }
    }

    fn handle_maker_key(&mut self, key: KeyEvent) {
        let Some(session) = self.maker.as_mut() else {
            self.view = View::Gallery;
            return;
        };

        let mut style_changed = true;
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => {
                self.close_maker();
                return;
            }
            KeyCode::Char('?') => {
                self.mode = AppMode::Help;
                return;
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                let t = &mut session.style.transform;
                t.scale = (t.scale + PhotoTransform::SCALE_STEP).min(PhotoTransform::SCALE_MAX);
            }
            KeyCode::Char('-') => {
                let t = &mut session.style.transform;
                t.scale = (t.scale - PhotoTransform::SCALE_STEP).max(PhotoTransform::SCALE_MIN);
            }
            KeyCode::Char(']') => {
                let t = &mut session.style.transform;
                t.rotate = (t.rotate + PhotoTransform::ROTATE_STEP).min(PhotoTransform::ROTATE_MAX);
            }
            KeyCode::Char('[') => {
                let t = &mut session.style.transform;
                t.rotate = (t.rotate - PhotoTransform::ROTATE_STEP).max(PhotoTransform::ROTATE_MIN);
            }
            KeyCode::Left => {
                let t = &mut session.style.transform;
                t.x = (t.x - PhotoTransform::OFFSET_STEP).max(PhotoTransform::X_MIN);
            }
            KeyCode::Right => {
                let t = &mut session.style.transform;
                t.x = (t.x + PhotoTransform::OFFSET_STEP).min(PhotoTransform::X_MAX);
            }
            KeyCode::Up => {
                let t = &mut session.style.transform;
                t.y = (t.y - PhotoTransform::OFFSET_STEP).max(PhotoTransform::Y_MIN);
            }
            KeyCode::Down => {
                let t = &mut session.style.transform;
                t.y = (t.y + PhotoTransform::OFFSET_STEP).min(PhotoTransform::Y_MAX);
            }
            KeyCode::Char('0') => {
                session.style.transform = PhotoTransform::default();
            }
            KeyCode::Char('B') => {
                session.style.border_width =
                    (session.style.border_width + 2).min(BORDER_WIDTH_MAX);
            }
            KeyCode::Char('b') => {
                session.style.border_width = session
                    .style
                    .border_width
                    .saturating_sub(2)
                    .max(BORDER_WIDTH_MIN);
            }
            KeyCode::Char('c') => {
                session.style.border_color = next_palette_color(session.style.border_color);
            }
            KeyCode::Char('f') => {
                session.style.filter = session.style.filter.cycle_next();
            }
            KeyCode::Char('F') => {
                session.style.filter = session.style.filter.cycle_prev();
            }
            KeyCode::Char('o') => {
                session.style.holo = !session.style.holo;
            }
            KeyCode::Char('t') => {
                let text = session.style.text.clone();
                self.open_input(InputPurpose::CardLabel, "Card text", &text);
                return;
            }
            KeyCode::Char('3') => {
                session.toggle_three_d();
                style_changed = false;
            }
            KeyCode::Char('s') => {
                self.export_card();
                return;
            }
            _ => style_changed = false,
        }

        if style_changed {
            self.maker_preview.invalidate();
        }
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter | KeyCode::Char('y') => {
                if let Some(dialog) = self.confirm_dialog.take() {
                    self.execute_pending(dialog.action);
                }
                if self.mode == AppMode::Confirming {
                    self.mode = AppMode::Normal;
                }
            }
            KeyCode::Esc | KeyCode::Char('n') => {
                // Declining goes back to wherever the request came from.
                self.mode = match self.confirm_dialog.take() {
                    Some(dialog) => dialog.return_mode,
                    None => AppMode::Normal,
                };
            }
            _ => {}
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent) {
        if self.input_dialog.is_none() {
            self.mode = AppMode::Normal;
            return;
        }
        match key.code {
            KeyCode::Esc => {
                self.input_dialog = None;
                self.mode = AppMode::Normal;
            }
            KeyCode::Enter => self.confirm_input(),
            code => {
                if let Some(dialog) = self.input_dialog.as_mut() {
                    match code {
                        KeyCode::Left => dialog.move_cursor_left(),
                        KeyCode::Right => dialog.move_cursor_right(),
                        KeyCode::Home => dialog.move_cursor_home(),
                        KeyCode::End => dialog.move_cursor_end(),
                        KeyCode::Backspace => dialog.backspace(),
                        KeyCode::Delete => dialog.delete(),
                        KeyCode::Char(c) => dialog.handle_char(c),
                        _ => {}
                    }
                }
            }
        }
    }

    fn handle_theme_key(&mut self, key: KeyEvent) {
        let Some(dialog) = self.theme_dialog.as_mut() else {
            self.mode = AppMode::Normal;
            return;
        };
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('t') => {
                self.theme_dialog = None;
                self.mode = AppMode::Normal;
            }
            KeyCode::Char('j') | KeyCode::Down => dialog.move_down(),
            KeyCode::Char('k') | KeyCode::Up => dialog.move_up(),
            KeyCode::Enter => {
                let (start, end) = dialog.selected_colors();
                self.theme.start = start;
                self.theme.end = end;
            }
            KeyCode::Char('a') => self.theme.rotate(Theme::ANGLE_STEP as i32),
            KeyCode::Char('A') => self.theme.rotate(-(Theme::ANGLE_STEP as i32)),
            KeyCode::Char('s') => self.theme.shift_split(Theme::SPLIT_STEP as i32),
            KeyCode::Char('S') => self.theme.shift_split(-(Theme::SPLIT_STEP as i32)),
            _ => {}
        }
    }

    // --- Mouse ---

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        // Only the maker preview reacts to the mouse, and only to motion.
        if self.view != View::Maker || self.mode != AppMode::Normal {
            return;
        }
        if !matches!(mouse.kind, MouseEventKind::Moved) {
            return;
        }
        let Some(session) = self.maker.as_mut() else {
            return;
        };
        let Some(area) = self.maker_preview_area else {
            return;
        };

        let inside = mouse.column >= area.x
            && mouse.column < area.x + area.width
            && mouse.row >= area.y
            && mouse.row < area.y + area.height;

        if inside {
            session.pointer_moved(
                (mouse.column - area.x) as f32,
                (mouse.row - area.y) as f32,
                area.width as f32,
                area.height as f32,
            );
        } else {
            session.pointer_left();
        }
    }

    // --- Navigation ---

    fn open_gallery(&mut self) {
        if let Some(category) = self.store.categories().get(self.home_selected) {
            self.current_category = Some(category.id.clone());
            self.gallery_selected = 0;
            self.gallery_scroll = 0;
            self.view = View::Gallery;
            self.status_message = None;
        }
    }

    fn close_gallery(&mut self) {
        self.current_category = None;
        self.view = View::Home;
        self.clear_on_next_render = true;
    }

    fn open_maker(&mut self) {
        let photos = self.visible_photos();
        if let Some(photo) = photos.get(self.gallery_selected) {
            self.maker = Some(MakerSession::new(photo.id.clone()));
            self.maker_preview = MakerPreview::new();
            self.view = View::Maker;
            self.mode = AppMode::Normal;
            self.status_message = None;
        }
    }

    fn close_maker(&mut self) {
        self.maker = None;
        self.maker_preview = MakerPreview::new();
        self.maker_preview_area = None;
        self.view = View::Gallery;
        self.clear_on_next_render = true;
    }

    // --- Store commands ---

    fn open_rename_category(&mut self) {
        let Some(category) = self.store.categories().get(self.home_selected) else {
            return;
        };
        if category.is_default {
            self.status_message = Some("The default collection cannot be renamed".to_string());
            return;
        }
        let name = category.name.clone();
        self.open_input(
            InputPurpose::RenameCategory(category.id.clone()),
            "Rename category",
            &name,
        );
    }

    fn open_set_cover(&mut self) {
        let Some(category) = self.store.categories().get(self.home_selected) else {
            return;
        };
        self.open_input(
            InputPurpose::CoverPath(category.id.clone()),
            "Cover image path (empty clears)",
            "",
        );
    }

    fn request_delete_category(&mut self) {
        let Some(category) = self.store.categories().get(self.home_selected) else {
            return;
        };
        if category.is_default {
            self.status_message = Some("The default collection cannot be deleted".to_string());
            return;
        }
        let count = self.store.photo_count(category);
        let message = format!(
            "Delete \"{}\"? Its {} photos will move to {}.",
            category.name,
            count,
            crate::model::DEFAULT_CATEGORY_NAME
        );
        self.confirm_dialog = Some(ConfirmDialog::new(
            PendingAction::DeleteCategory(category.id.clone()),
            message,
            self.mode,
        ));
        self.mode = AppMode::Confirming;
    }

    fn request_delete_photo(&mut self) {
        let photos = self.visible_photos();
        let Some(photo) = photos.get(self.gallery_selected) else {
            return;
        };
        self.confirm_dialog = Some(ConfirmDialog::new(
            PendingAction::DeletePhoto(photo.id.clone()),
            "Delete this photo?".to_string(),
            self.mode,
        ));
        self.mode = AppMode::Confirming;
    }

    fn execute_pending(&mut self, action: PendingAction) {
        match action {
            PendingAction::DeleteCategory(id) => {
                if let Some(moved) = self.store.delete_category(&id) {
                    self.status_message = Some(format!(
                        "Category deleted, {} photos moved to {}",
                        moved,
                        crate::model::DEFAULT_CATEGORY_NAME
                    ));
                }
                let tiles = self.store.categories().len();
                if self.home_selected >= tiles {
                    self.home_selected = tiles.saturating_sub(1);
                }
                self.invalidate_covers();
            }
            PendingAction::DeletePhoto(id) => {
                if self.store.delete_photo(&id) {
                    self.thumbs.remove(&id);
                    self.invalidate_covers();
                }
                let count = self.visible_photo_count();
                if self.gallery_selected >= count {
                    self.gallery_selected = count.saturating_sub(1);
                }
                // The lightbox has nothing left to show for this slot.
                if self.mode == AppMode::Confirming {
                    self.mode = AppMode::Normal;
                }
                self.status_message = Some("Photo deleted".to_string());
            }
        }
    }

    fn open_input(&mut self, purpose: InputPurpose, title: &str, initial: &str) {
        self.input_dialog = Some(InputDialog::new(purpose, title, initial));
        self.mode = AppMode::TextEntry;
    }

    fn confirm_input(&mut self) {
        let Some(dialog) = self.input_dialog.take() else {
            self.mode = AppMode::Normal;
            return;
        };
        self.mode = AppMode::Normal;
        let value = dialog.value().to_string();

        match dialog.purpose {
            InputPurpose::NewCategory => {
                if self.store.create_category(&value).is_some() {
                    self.status_message = Some(format!("Created \"{}\"", value.trim()));
                } else {
                    self.status_message = Some("Category name cannot be empty".to_string());
                }
            }
            InputPurpose::RenameCategory(id) => {
                let cover = self
                    .store
                    .category(&id)
                    .and_then(|c| c.cover_image.clone());
                self.store.update_category(&id, &value, cover);
                self.status_message = Some("Category renamed".to_string());
            }
            InputPurpose::CoverPath(id) => {
                let Some(category) = self.store.category(&id) else {
                    return;
                };
                let name = category.name.clone();
                if value.trim().is_empty() {
                    self.store.update_category(&id, &name, None);
                    self.thumbs.remove(&format!("cover:{}", id));
                    self.status_message = Some("Cover cleared".to_string());
                } else {
                    match ingest::read_as_data_uri(PathBuf::from(value.trim()).as_path()) {
                        Some(uri) => {
                            self.store.update_category(&id, &name, Some(uri));
                            self.thumbs.remove(&format!("cover:{}", id));
                            self.status_message = Some("Cover updated".to_string());
                        }
                        None => {
                            self.status_message =
                                Some("Could not read that image".to_string());
                        }
                    }
                }
            }
            InputPurpose::ImportPath => {
                self.start_import(&value);
            }
            InputPurpose::CardLabel => {
                if let Some(session) = self.maker.as_mut() {
                    session.style.text = value;
                    self.maker_preview.invalidate();
                }
            }
        }
    }

    fn start_import(&mut self, raw_path: &str) {
        let dir = PathBuf::from(raw_path.trim());
        let files = ingest::list_image_files(&dir, &self.config.import.image_extensions);
        if files.is_empty() {
            self.status_message = Some(format!("No images found in {}", dir.display()));
            return;
        }
        let category = self
            .current_category
            .clone()
            .unwrap_or_else(|| DEFAULT_CATEGORY_ID.to_string());
        self.status_message = Some(format!("Importing {} photos...", files.len()));
        self.pending_imports.push(PendingIngest::start(files, category));
    }

    // --- Export ---

    fn export_card(&mut self) {
        let Some(session) = self.maker.as_mut() else {
            return;
        };
        let Some(photo) = self.store.photo(&session.photo_id).cloned() else {
            self.status_message = Some("Photo no longer exists".to_string());
            return;
        };
        let export = self.config.export.clone();
        match session.export(
            &photo,
            self.rasterizer.as_ref(),
            &export.dir,
            &export.prefix,
            export.upscale,
        ) {
            Ok(path) => {
                self.status_message = Some(format!("Saved {}", path.display()));
            }
            Err(err) => {
                self.status_message = Some(format!("Export failed: {}", err));
            }
        }
    }

    // --- Gallery helpers ---

    pub fn visible_photos(&self) -> Vec<&crate::model::Photo> {
        match self.current_category.as_deref() {
            Some(id) => self.store.photos_in(id),
            None => Vec::new(),
        }
    }

    pub fn visible_photo_count(&self) -> usize {
        self.visible_photos().len()
    }
}

fn theme_from_config(config: &Config) -> Theme {
    let defaults = Theme::default();
    Theme {
        start: Rgb::from_hex(&config.theme.start).unwrap_or(defaults.start),
        end: Rgb::from_hex(&config.theme.end).unwrap_or(defaults.end),
        angle: config.theme.angle % 360,
        split: config.theme.split.min(100),
    }
}

fn next_palette_color(current: Rgb) -> Rgb {
    let idx = BORDER_PALETTE
        .iter()
        .position(|hex| Rgb::from_hex(hex) == Some(current));
    let next = match idx {
        Some(i) => (i + 1) % BORDER_PALETTE.len(),
        None => 0,
    };
    Rgb::from_hex(BORDER_PALETTE[next]).unwrap_or(Rgb::new(0xff, 0xff, 0xff))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: event::KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn app() -> App {
        App::new(Config::default())
    }

    #[test]
    fn test_enter_on_category_opens_gallery() {
        let mut app = app();
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.view, View::Gallery);
        assert_eq!(app.current_category.as_deref(), Some(DEFAULT_CATEGORY_ID));

        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.view, View::Home);
        assert!(app.current_category.is_none());
    }

    #[test]
    fn test_enter_on_create_tile_opens_input() {
        let mut app = app();
        app.home_selected = app.store.categories().len();
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.mode, AppMode::TextEntry);

        for c in "Trips".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.mode, AppMode::Normal);
        assert!(app.store.categories().iter().any(|c| c.name == "Trips"));
    }

    #[test]
    fn test_blank_category_name_is_rejected() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('n')));
        app.handle_key(key(KeyCode::Char(' ')));
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.store.categories().len(), 1);
        assert!(app.status_message.as_deref().unwrap().contains("empty"));
    }

    #[test]
    fn test_default_category_cannot_be_deleted_or_renamed() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('d')));
        assert_eq!(app.mode, AppMode::Normal);
        assert!(app.confirm_dialog.is_none());

        app.handle_key(key(KeyCode::Char('r')));
        assert_eq!(app.mode, AppMode::Normal);
        assert!(app.input_dialog.is_none());
    }

    #[test]
    fn test_delete_category_needs_confirmation() {
        let mut app = app();
        let id = app.store.create_category("Trips").unwrap();
        app.home_selected = 1;

        app.handle_key(key(KeyCode::Char('d')));
        assert_eq!(app.mode, AppMode::Confirming);

        // Declining leaves the category alone.
        app.handle_key(key(KeyCode::Char('n')));
        assert!(app.store.category(&id).is_some());

        app.handle_key(key(KeyCode::Char('d')));
        app.handle_key(key(KeyCode::Char('y')));
        assert!(app.store.category(&id).is_none());
        assert!(app.home_selected < app.store.categories().len());
    }

    #[test]
    fn test_photo_delete_closes_lightbox() {
        let mut app = app();
        app.store.add_photo("data:image/png;base64,AA==".to_string(), "1");
        app.current_category = Some(DEFAULT_CATEGORY_ID.to_string());
        app.view = View::Gallery;
        app.mode = AppMode::Lightbox;

        app.handle_key(key(KeyCode::Char('d')));
        assert_eq!(app.mode, AppMode::Confirming);
        app.handle_key(key(KeyCode::Enter));

        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.visible_photo_count(), 0);
    }

    #[test]
    fn test_deleting_a_photo_refreshes_cover_tiles() {
        let mut app = app();
        app.store.add_photo("data:image/png;base64,AA==".to_string(), "1");
        app.current_category = Some(DEFAULT_CATEGORY_ID.to_string());
        app.view = View::Gallery;
        app.thumbs.mark_loading("cover:1");

        app.handle_key(key(KeyCode::Char('d')));
        app.handle_key(key(KeyCode::Char('y')));
        assert_eq!(app.visible_photo_count(), 0);
        assert!(!app.thumbs.is_loading("cover:1"));
    }

    #[test]
    fn test_clearing_cover_drops_cached_tile() {
        let mut app = app();
        app.thumbs.mark_loading("cover:1");

        app.handle_key(key(KeyCode::Char('c')));
        assert_eq!(app.mode, AppMode::TextEntry);
        app.handle_key(key(KeyCode::Enter));
        assert!(!app.thumbs.is_loading("cover:1"));
    }

    #[test]
    fn test_declining_lightbox_delete_keeps_lightbox_open() {
        let mut app = app();
        app.store.add_photo("data:image/png;base64,AA==".to_string(), "1");
        app.current_category = Some(DEFAULT_CATEGORY_ID.to_string());
        app.view = View::Gallery;
        app.mode = AppMode::Lightbox;

        app.handle_key(key(KeyCode::Char('d')));
        assert_eq!(app.mode, AppMode::Confirming);
        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.mode, AppMode::Lightbox);
        assert_eq!(app.visible_photo_count(), 1);
    }

    #[test]
    fn test_maker_requires_a_photo() {
        let mut app = app();
        app.current_category = Some(DEFAULT_CATEGORY_ID.to_string());
        app.view = View::Gallery;
        app.handle_key(key(KeyCode::Char('m')));
        assert_eq!(app.view, View::Gallery);
        assert!(app.maker.is_none());
    }

    #[test]
    fn test_maker_state_is_session_scoped() {
        let mut app = app();
        let id = app
            .store
            .add_photo("data:image/png;base64,AA==".to_string(), "1");
        app.current_category = Some(DEFAULT_CATEGORY_ID.to_string());
        app.view = View::Gallery;

        app.handle_key(key(KeyCode::Char('m')));
        assert_eq!(app.view, View::Maker);
        assert_eq!(app.maker.as_ref().unwrap().photo_id, id);

        app.handle_key(key(KeyCode::Char('o')));
        assert!(app.maker.as_ref().unwrap().style.holo);

        // Leaving discards the styling; a new session starts clean.
        app.handle_key(key(KeyCode::Esc));
        assert!(app.maker.is_none());
        app.handle_key(key(KeyCode::Char('m')));
        assert!(!app.maker.as_ref().unwrap().style.holo);
    }

    #[test]
    fn test_border_width_stays_in_range() {
        let mut app = app();
        app.store.add_photo("data:image/png;base64,AA==".to_string(), "1");
        app.current_category = Some(DEFAULT_CATEGORY_ID.to_string());
        app.view = View::Gallery;
        app.handle_key(key(KeyCode::Char('m')));

        for _ in 0..100 {
            app.handle_key(key(KeyCode::Char('B')));
        }
        assert_eq!(app.maker.as_ref().unwrap().style.border_width, BORDER_WIDTH_MAX);

        for _ in 0..100 {
            app.handle_key(key(KeyCode::Char('b')));
        }
        assert_eq!(app.maker.as_ref().unwrap().style.border_width, BORDER_WIDTH_MIN);
    }

    #[test]
    fn test_palette_cycles_through_all_colors() {
        let start = Rgb::from_hex(BORDER_PALETTE[0]).unwrap();
        let mut current = start;
        for _ in 0..BORDER_PALETTE.len() {
            current = next_palette_color(current);
        }
        assert_eq!(current, start);
    }

    #[test]
    fn test_mouse_motion_tilts_only_inside_preview() {
        let mut app = app();
        app.store.add_photo("data:image/png;base64,AA==".to_string(), "1");
        app.current_category = Some(DEFAULT_CATEGORY_ID.to_string());
        app.view = View::Gallery;
        app.handle_key(key(KeyCode::Char('m')));
        app.handle_key(key(KeyCode::Char('3')));
        app.maker_preview_area = Some(Rect::new(10, 5, 40, 20));

        let moved = |column, row| MouseEvent {
            kind: MouseEventKind::Moved,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        };

        app.handle_mouse(moved(30, 10));
        assert!(!app.maker.as_ref().unwrap().tilt.is_flat());

        app.handle_mouse(moved(0, 0));
        assert!(app.maker.as_ref().unwrap().tilt.is_flat());
    }
}
