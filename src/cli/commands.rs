//! Command dispatch: each subcommand loads what it needs and prints results

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::generate;
use kurbo::Size;
use termtree::Tree;
use tracing::{debug, instrument};

use crate::application::{
    apply_batch, parse_assignment, ApplicationError, TreeDocument, WeightChange,
};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::domain::{NodeId, TreeContainer};
use crate::layout::{LayoutDomain, LayoutEngine, Transition};
use crate::render::{geometry_for, RadialGeometry, SunburstView, ViewUpdate};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Layout {
            file,
            set,
            add,
            domain,
            skip_length,
            geometry,
            viewport,
        }) => {
            let changes = parse_changes(set, add)?;
            let mut settings = Settings::load(cli.config.as_deref())?;
            if let Some(domain) = domain {
                settings.layout.domain = *domain;
            }
            if let Some(skip_length) = skip_length {
                settings.layout.skip_length = *skip_length;
            }
            settings.validate()?;
            let geometry = *geometry || viewport.is_some();
            cmd_layout(file, &changes, &settings, geometry, *viewport)
        }
        Some(Commands::Tree { file }) => cmd_tree(file),
        Some(Commands::Config { command }) => match command {
            ConfigCommands::Show => cmd_config_show(cli.config.as_deref()),
            ConfigCommands::Template => {
                output::info(&Settings::template());
                Ok(())
            }
            ConfigCommands::Path => cmd_config_path(cli.config.as_deref()),
        },
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given, see sunburst --help".to_string(),
        )),
    }
}

/// `--set` changes come before `--add` changes, each in command-line order.
fn parse_changes(set: &[String], add: &[String]) -> CliResult<Vec<WeightChange>> {
    let mut changes = Vec::with_capacity(set.len() + add.len());
    for arg in set {
        let (path, weight) = parse_assignment(arg).map_err(CliError::InvalidArgs)?;
        changes.push(WeightChange::Set { path, weight });
    }
    for arg in add {
        let (path, delta) = parse_assignment(arg).map_err(CliError::InvalidArgs)?;
        changes.push(WeightChange::Add { path, delta });
    }
    Ok(changes)
}

#[instrument(skip(settings))]
fn cmd_layout(
    file: &Path,
    changes: &[WeightChange],
    settings: &Settings,
    geometry: bool,
    viewport: Option<f64>,
) -> CliResult<()> {
    let mut container = TreeDocument::load(file)?.to_container()?;
    debug!("loaded {}", container);

    let engine = LayoutEngine::new(settings.layout_config());
    let mut view = SunburstView::new(engine, settings.view.animate);
    view.attach(&mut container);
    view.sync(&container);

    output::header(&format!(
        "{} layout of {} ({})",
        settings.layout.domain,
        file.display(),
        container
    ));
    print_segments(&view);

    if !changes.is_empty() {
        apply_batch(&mut container, changes)?;
        match view.sync(&container) {
            Some(ViewUpdate::Animated { transitions }) => {
                output::header(&format!("{} segments move", transitions));
                print_transitions(view.transitions());
                view.finish_animation();
            }
            Some(_) => {
                output::header("updated layout");
                print_segments(&view);
            }
            None => output::warning("weights changed but no update was received"),
        }
    }

    if geometry {
        let side = viewport_side(settings, container.max_depth(), viewport);
        print_geometry(&view, &container, settings, side)?;
    }
    Ok(())
}

fn print_segments(view: &SunburstView) {
    for segment in view.layout().iter() {
        if segment.is_visible() {
            output::segment(&segment.path, &segment.placement);
        } else {
            output::hidden(&segment.path, &segment.placement);
        }
    }
}

fn print_transitions(transitions: &[Transition]) {
    for transition in transitions.iter().filter(|t| !t.is_unchanged()) {
        output::moved(&transition.path, &transition.from, &transition.to);
    }
}

/// The given side, or the one the rings prefer at `view.layer_height`.
fn viewport_side(settings: &Settings, max_depth: usize, viewport: Option<f64>) -> f64 {
    viewport.unwrap_or_else(|| {
        RadialGeometry::preferred_side(
            max_depth,
            settings.view.layer_height,
            settings.view.inner_radius_weight,
            settings.layout.skip_length,
        )
    })
}

fn print_geometry(
    view: &SunburstView,
    container: &TreeContainer,
    settings: &Settings,
    side: f64,
) -> CliResult<()> {
    let domain: LayoutDomain = settings.layout.domain;
    let geometry = geometry_for(
        domain,
        Size::new(side, side),
        container.max_depth(),
        settings.view.inner_radius_weight,
        settings.layout.skip_length,
    )
    .map_err(ApplicationError::from)?;
    output::header(&format!("anchors in a {0}x{0} viewport", side));
    for frame in view.frame(1.0) {
        let (depth, placement) = (frame.segment.depth, frame.placement);
        let anchor = geometry.anchor_and_extent(depth, placement);
        output::segment(
            &frame.segment.path,
            &format!(
                "at ({:.1}, {:.1}) extent {:.1}",
                anchor.point.x, anchor.point.y, anchor.extent
            ),
        );
        if let Some(icon) = frame.segment.tags.icon {
            match geometry.icon_placement(depth, placement, settings.view.icon_scale) {
                Some(rect) => output::detail(&format!(
                    "icon {} in {:.1}x{:.1} at ({:.1}, {:.1})",
                    icon,
                    rect.width(),
                    rect.height(),
                    rect.x0,
                    rect.y0
                )),
                None => output::detail(&format!("icon {} does not fit", icon)),
            }
        }
    }
    Ok(())
}

#[instrument]
fn cmd_tree(file: &Path) -> CliResult<()> {
    let container = TreeDocument::load(file)?.to_container()?;
    let mut tree = Tree::new(file.display().to_string());
    for &root in container.roots() {
        tree.leaves.push(display_tree(&container, root));
    }
    output::info(&tree);
    Ok(())
}

fn display_tree(container: &TreeContainer, id: NodeId) -> Tree<String> {
    let label = container
        .node(id)
        .map(|n| format!("{} ({})", n.label(), n.weight()))
        .unwrap_or_default();
    let mut tree = Tree::new(label);
    tree.leaves = container
        .tree()
        .children(id)
        .iter()
        .map(|&child| display_tree(container, child))
        .collect();
    tree
}

fn cmd_config_show(local: Option<&Path>) -> CliResult<()> {
    let settings = Settings::load(local)?;
    output::info(&settings.to_toml()?);
    Ok(())
}

fn cmd_config_path(local: Option<&Path>) -> CliResult<()> {
    let describe = |path: &PathBuf| {
        let state = if path.exists() { "exists" } else { "not found" };
        format!("{} ({})", path.display(), state)
    };
    match global_config_path() {
        Some(path) => output::detail(&format!("global: {}", describe(&path))),
        None => output::detail("global: no config directory on this platform"),
    }
    if let Some(path) = local {
        output::detail(&format!("local:  {}", describe(&path.to_path_buf())));
    }
    Ok(())
}
