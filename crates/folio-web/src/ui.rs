//! UI overlays using bevy_egui: navigation, sections, loading placeholder, fallback notice

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiPrimaryContextPass};
use folio_core::model::ModelView;
use folio_core::{Contact, Fallback, Section, SiteContent};

use crate::host::ActiveHost;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<OpenSection>()
            // Runs in EguiPrimaryContextPass for proper input handling (bevy_egui 0.38+)
            .add_systems(EguiPrimaryContextPass, (nav_bar, section_window, scene_overlay));
    }
}

/// Page content shown in the overlay
#[derive(Resource)]
pub struct PageContent(pub SiteContent);

/// Navigation section currently expanded, by nav link id
#[derive(Debug, Clone, Resource, Default)]
pub struct OpenSection(pub Option<String>);

fn nav_bar(mut contexts: EguiContexts, content: Res<PageContent>, mut open: ResMut<OpenSection>) {
    let Ok(ctx) = contexts.ctx_mut() else { return };

    egui::TopBottomPanel::top("nav")
        .frame(egui::Frame::NONE.inner_margin(egui::Margin::symmetric(16, 8)))
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                for link in content.0.visible_nav_links() {
                    let selected = open.0.as_deref() == Some(link.id.as_str());
                    if ui.selectable_label(selected, &link.title).clicked() {
                        open.0 = if selected { None } else { Some(link.id.clone()) };
                    }
                }
            });
        });
}

fn section_window(mut contexts: EguiContexts, content: Res<PageContent>, mut open: ResMut<OpenSection>) {
    let Some(id) = open.0.clone() else { return };
    let content = &content.0;
    let Some(section) = content.section(&id) else {
        open.0 = None;
        return;
    };
    let Ok(ctx) = contexts.ctx_mut() else { return };
    let title = content
        .nav_link(&id)
        .map(|l| l.title.clone())
        .unwrap_or(id);

    let mut still_open = true;
    egui::Window::new(title)
        .open(&mut still_open)
        .collapsible(false)
        .resizable(true)
        .default_width(360.0)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| match section {
                Section::About => about_section(ui, content),
                Section::Work => work_section(ui, content),
                Section::Contact => {
                    if let Some(contact) = &content.contact {
                        contact_section(ui, contact);
                    }
                }
            });
        });

    if !still_open {
        open.0 = None;
    }
}

fn about_section(ui: &mut egui::Ui, content: &SiteContent) {
    ui.heading("Services");
    for service in &content.services {
        ui.label(&service.title);
    }
    ui.separator();
    ui.heading("Technologies");
    ui.horizontal_wrapped(|ui| {
        for tech in &content.technologies {
            ui.label(egui::RichText::new(&tech.name).small());
        }
    });
}

fn work_section(ui: &mut egui::Ui, content: &SiteContent) {
    for experience in &content.experiences {
        ui.label(egui::RichText::new(&experience.title).strong());
        ui.label(
            egui::RichText::new(format!("{} · {}", experience.company_name, experience.date))
                .small()
                .color(egui::Color32::GRAY),
        );
        for point in &experience.points {
            ui.label(format!("• {}", point));
        }
        ui.add_space(8.0);
    }
}

fn contact_section(ui: &mut egui::Ui, contact: &Contact) {
    ui.label(&contact.message);
    if !contact.links.is_empty() {
        ui.add_space(8.0);
    }
    for link in &contact.links {
        ui.hyperlink_to(&link.label, &link.url);
    }
}

/// Suspension placeholder while the model loads, notice after a failure
fn scene_overlay(mut contexts: EguiContexts, host: NonSend<ActiveHost>) {
    let Ok(ctx) = contexts.ctx_mut() else { return };

    if host.boundary().is_tripped() {
        if let Fallback::Notice(text) = host.boundary().fallback() {
            egui::Area::new(egui::Id::new("scene_fallback"))
                .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
                .show(ctx, |ui| {
                    ui.label(egui::RichText::new(text).color(egui::Color32::LIGHT_GRAY));
                });
        }
        return;
    }

    if matches!(host.model_view(), ModelView::Placeholder) {
        egui::Area::new(egui::Id::new("scene_loader"))
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.add(egui::Spinner::new().size(32.0));
            });
    }
}
