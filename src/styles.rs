//! Static catalogs: news categories and image style presets.

/// News categories offered on the home screen.
pub const NEWS_CATEGORIES: [&str; 6] = [
    "Brasil",
    "Mundo",
    "Política",
    "Esportes",
    "Tecnologia",
    "Economia",
];

/// A visual style preset for image generation. The prompt fragment is
/// appended to every image request of a story.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageStyle {
    pub id: &'static str,
    pub label: &'static str,
    pub emoji: &'static str,
    pub prompt: &'static str,
}

pub const IMAGE_STYLES: [ImageStyle; 6] = [
    ImageStyle {
        id: "default",
        label: "Vetorial Padrão",
        emoji: "🔷",
        prompt: "o estilo deve ser vetorial, moderno, com cores extremamente vibrantes, contornos nítidos e um alto nível de detalhe. A estética deve ser limpa e gráfica.",
    },
    ImageStyle {
        id: "cartoon",
        label: "Cartoon 2D",
        emoji: "🎬",
        prompt: "o estilo deve ser cartoon 2D vibrante, com linhas de contorno definidas, cores planas e saturadas, e personagens expressivos, lembrando animações modernas de TV.",
    },
    ImageStyle {
        id: "3d",
        label: "3D Pixar",
        emoji: "🧸",
        prompt: "o estilo deve ser renderização 3D estilizada (tipo Pixar/Disney), com iluminação suave, texturas fofas (soft shading), formas arredondadas e cores agradáveis.",
    },
    ImageStyle {
        id: "watercolor",
        label: "Aquarela",
        emoji: "🖌️",
        prompt: "o estilo deve ser aquarela artística, com pinceladas suaves, transições de cor fluidas, bordas levemente desfocadas e uma estética delicada e orgânica.",
    },
    ImageStyle {
        id: "neon",
        label: "Neon Cyberpunk",
        emoji: "🌃",
        prompt: "o estilo deve ser cyberpunk neon, com cores vibrantes (rosa, ciano, roxo), iluminação neon intensa, alto contraste, atmosfera futurista e urbana noturna.",
    },
    ImageStyle {
        id: "minimalist",
        label: "Minimalista",
        emoji: "⚪",
        prompt: "o estilo deve ser minimalista e clean, com formas geométricas simples, paleta de cores limitada (2-3 cores), muito espaço negativo e design ultra-simplificado.",
    },
];

/// Look up a style preset by its id.
pub fn style_by_id(id: &str) -> Option<&'static ImageStyle> {
    IMAGE_STYLES.iter().find(|s| s.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_lookup() {
        assert_eq!(style_by_id("neon").map(|s| s.label), Some("Neon Cyberpunk"));
        assert!(style_by_id("vaporwave").is_none());
    }
}
