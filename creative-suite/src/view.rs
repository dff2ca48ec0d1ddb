//! Screen routing and tool-local state, gated by the trial.
//!
//! 宿主（终端或其他界面）只负责渲染与转发用户操作；所有状态与门控都在这里。

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::generator::ImageGenerator;
use crate::media::{GeneratedImage, ImagePayload};
use crate::orchestrator::Orchestrator;
use crate::poster::PosterRequest;
use crate::trial::{KeyValueStore, TrialGate, TrialState, Unlocked};
use crate::upload::ImageUploader;

pub const HEADLINE: &str = "AI Creative Suite";

pub const BOTH_PARENTS_REQUIRED: &str = "Please upload both parents' images.";
pub const CHILD_GENERATION_FAILED: &str = "Failed to generate images. The AI may be busy, or the images might not be suitable. Please try again with different photos.";
pub const POSTER_FIELDS_REQUIRED: &str =
    "Organization Name, Topic, and Description are required.";
pub const POSTER_GENERATION_FAILED: &str =
    "Failed to generate poster. The AI may be busy or the inputs may be unsuitable. Please try again.";
pub const INCORRECT_PASSWORD: &str = "Incorrect password. Please try again.";

pub const LOCK_TITLE: &str = "Trial Used";
pub const LOCK_MESSAGE: &str =
    "Thank you for trying our AI tools! Please enter the password to unlock unlimited access.";

/// 使用步骤（孩子工具页展示）。
pub const HOW_TO_STEPS: [&str; 6] = [
    "Upload a photo for the father in the designated box.",
    "Upload a photo for the mother in the second box.",
    "Once both images are uploaded, the generate button will activate.",
    "Click \"Generate Child Images\" and wait for the AI to process.",
    "Your four generated images will appear below.",
    "Click the download button on any image to save it.",
];

/// 拍照建议（孩子工具页展示）。
pub const PHOTO_TIPS: [&str; 6] = [
    "Use clear, front-facing portraits.",
    "Ensure good, even lighting without harsh shadows.",
    "Keep a neutral expression or a gentle smile.",
    "Avoid sunglasses, hats, or anything that obscures facial features.",
    "Don't use photos with heavy filters or effects.",
    "Avoid group photos or pictures where the face is far away.",
];

pub const DISCLAIMER: &str = "This tool is for entertainment purposes only. The generated images are an artistic interpretation by AI and not a prediction of future appearance.";

/// 可选工具。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Poster,
    Child,
}

impl Tool {
    const fn name(self) -> &'static str {
        match self {
            Self::Poster => "poster",
            Self::Child => "child",
        }
    }
}

/// 当前屏幕。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Home,
    Poster,
    Child,
}

impl Screen {
    #[must_use]
    pub const fn subtitle(self) -> &'static str {
        match self {
            Self::Home => "Choose a tool to start creating with AI.",
            Self::Child => "Envision your future child with AI.",
            Self::Poster => "Generate stunning advertisement posters in seconds.",
        }
    }
}

impl From<Tool> for Screen {
    fn from(tool: Tool) -> Self {
        match tool {
            Tool::Poster => Self::Poster,
            Tool::Child => Self::Child,
        }
    }
}

/// 首页卡片。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HomeCard {
    pub tool: Tool,
    pub title: &'static str,
    pub description: &'static str,
}

pub const HOME_CARDS: [HomeCard; 2] = [
    HomeCard {
        tool: Tool::Poster,
        title: "AI Ad Poster Generator",
        description: "Create professional posters for your school, business, or event in seconds.",
    },
    HomeCard {
        tool: Tool::Child,
        title: "AI Future Glimpse",
        description: "Upload photos of two parents to get a glimpse of their potential future child.",
    },
];

/// 孩子肖像工具的本地状态。
#[derive(Debug, Clone)]
pub struct ChildTool {
    pub father: ImageUploader,
    pub mother: ImageUploader,
    father_image: Option<ImagePayload>,
    mother_image: Option<ImagePayload>,
    results: Vec<GeneratedImage>,
    error: Option<String>,
}

impl Default for ChildTool {
    fn default() -> Self {
        Self {
            father: ImageUploader::new("Father's Photo"),
            mother: ImageUploader::new("Mother's Photo"),
            father_image: None,
            mother_image: None,
            results: Vec::new(),
            error: None,
        }
    }
}

impl ChildTool {
    /// 两张照片都已上传。
    #[must_use]
    pub const fn can_generate(&self) -> bool {
        self.father_image.is_some() && self.mother_image.is_some()
    }

    #[must_use]
    pub fn results(&self) -> &[GeneratedImage] {
        &self.results
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub async fn upload_father(&mut self, path: impl AsRef<Path>) {
        let slot = &mut self.father_image;
        self.father.select_file(path, |image| *slot = image).await;
    }

    pub async fn upload_mother(&mut self, path: impl AsRef<Path>) {
        let slot = &mut self.mother_image;
        self.mother.select_file(path, |image| *slot = image).await;
    }

    async fn generate<G: ImageGenerator>(&mut self, orchestrator: &Orchestrator<G>) -> Result<()> {
        self.error = None;
        let (Some(father), Some(mother)) = (&self.father_image, &self.mother_image) else {
            self.error = Some(BOTH_PARENTS_REQUIRED.to_string());
            return Err(Error::MissingField {
                field: if self.father_image.is_none() {
                    "father_image"
                } else {
                    "mother_image"
                },
            });
        };
        self.results.clear();
        match orchestrator.generate_child_images(father, mother).await {
            Ok(images) => {
                self.results = images;
                Ok(())
            }
            Err(err) => {
                self.error = Some(CHILD_GENERATION_FAILED.to_string());
                Err(err)
            }
        }
    }

    fn result(&self, index: usize) -> Option<&GeneratedImage> {
        self.results.iter().find(|image| image.index == index)
    }
}

/// 海报工具的本地状态。
#[derive(Debug, Clone)]
pub struct PosterTool {
    form: PosterRequest,
    pub logo: ImageUploader,
    pub extra: ImageUploader,
    result: Option<GeneratedImage>,
    error: Option<String>,
}

impl Default for PosterTool {
    fn default() -> Self {
        Self {
            form: PosterRequest::default(),
            logo: ImageUploader::new("Logo (Optional)"),
            extra: ImageUploader::new("Extra Image for Creativity (Optional)"),
            result: None,
            error: None,
        }
    }
}

impl PosterTool {
    #[must_use]
    pub const fn form(&self) -> &PosterRequest {
        &self.form
    }

    /// 编辑文本字段与类别。图片请通过上传位设置。
    pub fn form_mut(&mut self) -> &mut PosterRequest {
        &mut self.form
    }

    /// 必填字段均已填写。
    #[must_use]
    pub fn can_generate(&self) -> bool {
        [
            &self.form.organization_name,
            &self.form.topic,
            &self.form.description,
        ]
        .iter()
        .all(|value| !value.trim().is_empty())
    }

    #[must_use]
    pub const fn result(&self) -> Option<&GeneratedImage> {
        self.result.as_ref()
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub async fn upload_logo(&mut self, path: impl AsRef<Path>) {
        let slot = &mut self.form.logo;
        self.logo.select_file(path, |image| *slot = image).await;
    }

    pub async fn upload_extra_image(&mut self, path: impl AsRef<Path>) {
        let slot = &mut self.form.extra_image;
        self.extra.select_file(path, |image| *slot = image).await;
    }

    async fn generate<G: ImageGenerator>(&mut self, orchestrator: &Orchestrator<G>) -> Result<()> {
        self.error = None;
        if !self.can_generate() {
            self.error = Some(POSTER_FIELDS_REQUIRED.to_string());
            return self.form.validate();
        }
        self.result = None;
        match orchestrator.generate_poster(&self.form).await {
            Ok(image) => {
                self.result = Some(image);
                Ok(())
            }
            Err(err) => {
                self.error = Some(POSTER_GENERATION_FAILED.to_string());
                Err(err)
            }
        }
    }
}

#[derive(Debug)]
enum ActiveScreen {
    Home,
    Poster(PosterTool),
    Child(ChildTool),
}

/// 视图控制器：路由、工具状态与试用门控。
#[derive(Debug)]
pub struct ViewController<G, S> {
    orchestrator: Orchestrator<G>,
    gate: TrialGate<S>,
    screen: ActiveScreen,
    unlock_error: Option<String>,
}

impl<G: ImageGenerator, S: KeyValueStore> ViewController<G, S> {
    pub const fn new(orchestrator: Orchestrator<G>, gate: TrialGate<S>) -> Self {
        Self {
            orchestrator,
            gate,
            screen: ActiveScreen::Home,
            unlock_error: None,
        }
    }

    #[must_use]
    pub const fn screen(&self) -> Screen {
        match self.screen {
            ActiveScreen::Home => Screen::Home,
            ActiveScreen::Poster(_) => Screen::Poster,
            ActiveScreen::Child(_) => Screen::Child,
        }
    }

    #[must_use]
    pub const fn subtitle(&self) -> &'static str {
        self.screen().subtitle()
    }

    #[must_use]
    pub const fn trial_state(&self) -> TrialState {
        self.gate.state()
    }

    #[must_use]
    pub const fn is_locked(&self) -> bool {
        self.gate.is_locked()
    }

    #[must_use]
    pub fn unlock_error(&self) -> Option<&str> {
        self.unlock_error.as_deref()
    }

    /// 打开工具，丢弃之前工具的全部状态。
    pub fn select_tool(&mut self, tool: Tool) {
        tracing::debug!(tool = tool.name(), "tool selected");
        self.screen = match tool {
            Tool::Poster => ActiveScreen::Poster(PosterTool::default()),
            Tool::Child => ActiveScreen::Child(ChildTool::default()),
        };
    }

    /// 返回首页，丢弃当前工具状态。
    pub fn go_home(&mut self) {
        self.screen = ActiveScreen::Home;
    }

    /// 当前打开的孩子工具（只读）。
    #[must_use]
    pub const fn child(&self) -> Option<&ChildTool> {
        match &self.screen {
            ActiveScreen::Child(tool) => Some(tool),
            _ => None,
        }
    }

    /// 当前打开的海报工具（只读）。
    #[must_use]
    pub const fn poster(&self) -> Option<&PosterTool> {
        match &self.screen {
            ActiveScreen::Poster(tool) => Some(tool),
            _ => None,
        }
    }

    /// 可编辑的孩子工具。
    ///
    /// # Errors
    /// 锁定时返回 [`Error::Locked`]；未打开时返回 [`Error::ToolNotActive`]。
    pub fn child_mut(&mut self) -> Result<&mut ChildTool> {
        self.ensure_unlocked()?;
        match &mut self.screen {
            ActiveScreen::Child(tool) => Ok(tool),
            _ => Err(Error::ToolNotActive {
                tool: Tool::Child.name(),
            }),
        }
    }

    /// 可编辑的海报工具。
    ///
    /// # Errors
    /// 锁定时返回 [`Error::Locked`]；未打开时返回 [`Error::ToolNotActive`]。
    pub fn poster_mut(&mut self) -> Result<&mut PosterTool> {
        self.ensure_unlocked()?;
        match &mut self.screen {
            ActiveScreen::Poster(tool) => Ok(tool),
            _ => Err(Error::ToolNotActive {
                tool: Tool::Poster.name(),
            }),
        }
    }

    /// 运行当前工具的生成操作。结果与提示保存在工具状态中。
    ///
    /// # Errors
    /// 锁定、未打开工具、输入缺失或生成失败时返回错误。
    pub async fn generate(&mut self) -> Result<()> {
        self.ensure_unlocked()?;
        match &mut self.screen {
            ActiveScreen::Child(tool) => tool.generate(&self.orchestrator).await,
            ActiveScreen::Poster(tool) => tool.generate(&self.orchestrator).await,
            ActiveScreen::Home => Err(Error::ToolNotActive { tool: "any" }),
        }
    }

    /// 将序号为 `index` 的结果保存到目录 `dest`，并记录首次下载。
    ///
    /// # Errors
    /// 锁定、无此结果、写文件或持久化失败时返回错误。
    pub async fn download(&mut self, index: usize, dest: impl AsRef<Path>) -> Result<PathBuf> {
        self.ensure_unlocked()?;
        let image = match &self.screen {
            ActiveScreen::Child(tool) => tool.result(index),
            ActiveScreen::Poster(tool) => tool.result().filter(|image| image.index == index),
            ActiveScreen::Home => None,
        }
        .ok_or(Error::NoSuchImage { index })?;

        let path = dest.as_ref().join(image.file_name());
        image.save(&path).await?;
        tracing::info!(path = %path.display(), "image saved");
        self.gate.record_first_download()?;
        Ok(path)
    }

    /// 尝试解锁；失败时记录提示文案，可无限重试。
    ///
    /// # Errors
    /// 口令错误时返回 [`Error::IncorrectPassword`]。
    pub fn unlock(&mut self, candidate: &str) -> Result<Unlocked> {
        match self.gate.attempt_unlock(candidate) {
            Ok(unlocked) => {
                self.unlock_error = None;
                Ok(unlocked)
            }
            Err(err) => {
                if matches!(err, Error::IncorrectPassword) {
                    self.unlock_error = Some(INCORRECT_PASSWORD.to_string());
                }
                Err(err)
            }
        }
    }

    fn ensure_unlocked(&self) -> Result<()> {
        if self.gate.is_locked() {
            return Err(Error::Locked);
        }
        Ok(())
    }
}
