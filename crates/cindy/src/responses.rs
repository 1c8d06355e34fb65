//! Reply templates and follow-up suggestions per intent.
//!
//! Placeholders: `[NOM]` agent name, `[VILLE]` place, `[NOMBRE]` number,
//! `[HEURE]` current time, `[DATE]` current date. A template whose placeholder
//! has no value is never chosen.

use chrono::{DateTime, Local};
use rand::seq::SliceRandom;

use crate::calendar;
use crate::entities::EntityMap;
use crate::intent::Intent;

const GREETING: &[&str] = &[
  "Bonjour ! Comment puis-je vous aider aujourd'hui ?",
  "Salut ! Je suis [NOM], votre assistante. Que puis-je faire pour vous ?",
  "Bonjour ! Que puis-je faire pour vous ?",
];

const FAREWELL: &[&str] = &[
  "Au revoir ! N'hésitez pas à revenir si vous avez d'autres questions.",
  "À bientôt ! J'ai été ravie de pouvoir vous aider.",
  "Au plaisir de vous revoir bientôt !",
];

/// Only used when no report could be produced at all.
const WEATHER: &[&str] = &[
  "Je vais consulter la météo pour vous.",
  "Je vais consulter la météo à [VILLE] pour vous.",
  "Laissez-moi vérifier la météo.",
];

const TIME: &[&str] = &[
  "Il est actuellement [HEURE].",
  "L'heure actuelle est [HEURE].",
  "En ce moment, il est [HEURE].",
];

const DATE: &[&str] = &[
  "Nous sommes le [DATE].",
  "Aujourd'hui, nous sommes le [DATE].",
  "La date d'aujourd'hui est le [DATE].",
];

const THANKS: &[&str] = &[
  "De rien ! C'est un plaisir de t'aider.",
  "Je t'en prie. Y a-t-il autre chose que je puisse faire pour toi ?",
  "Avec plaisir ! N'hésite pas si tu as d'autres questions.",
  "De rien, c'est toujours agréable de pouvoir t'aider !",
  "Pas de souci, c'est mon rôle de t'être utile !",
  "Je suis contente de pouvoir t'aider. N'hésite pas si tu as besoin d'autre chose.",
];

const WELLBEING_QUESTION: &[&str] = &[
  "Je vais super bien aujourd'hui, merci de demander ! Et toi, comment ça va ?",
  "Tout va bien, merci ! C'est gentil de t'inquiéter pour moi. Et de ton côté ?",
  "Je me sens en pleine forme ! J'espère que ta journée se passe bien aussi ?",
  "Ça va très bien, merci ! Et toi, comment se passe ta journée ?",
  "Plutôt bien ! C'est toujours un plaisir de discuter avec toi. Comment vas-tu ?",
  "Je me porte à merveille, merci ! J'espère que toi aussi ?",
];

const WELLBEING_ANSWER: &[&str] = &[
  "Je suis contente de l'apprendre ! Comment puis-je t'aider aujourd'hui ?",
  "C'est super ! Que puis-je faire pour toi ?",
  "Excellent ! Je suis là si tu as besoin de quoi que ce soit.",
  "Tant mieux ! Y a-t-il quelque chose dont tu voudrais discuter ?",
  "Merci de partager ça avec moi ! En quoi puis-je t'être utile ?",
  "C'est bien de le savoir ! N'hésite pas à me demander de l'aide si tu en as besoin.",
  "Parfait ! Que veux-tu savoir ou faire maintenant ?",
  "Compris ! Je suis prête à t'aider pour la suite.",
];

const HELP: &[&str] = &[
  "Je suis [NOM], votre assistante. Je peux répondre à des questions, vous donner l'heure, la météo, raconter des blagues et discuter avec vous. Essayez de me demander 'Quelle heure est-il ?', 'Quel temps fait-il à Paris ?' ou 'Raconte-moi une blague'.",
  "Je peux vous aider sur plusieurs sujets : l'heure actuelle, la météo dans différentes villes, des blagues, des informations sur moi-même. Essayez de me poser ces questions !",
  "Comment puis-je vous aider aujourd'hui ? Je peux vous donner l'heure, la météo, vous raconter une blague, ou simplement discuter avec vous. N'hésitez pas à demander !",
];

const CAPABILITIES: &[&str] = &[
  "Je peux vous donner la météo, l'heure, la date, et répondre à vos questions générales.",
  "Mes capacités incluent : informations météo, heure et date, assistance générale et conversation simple.",
  "Je suis capable de vous informer sur la météo, vous donner l'heure et la date, et répondre à diverses questions.",
];

const IDENTITY: &[&str] = &[
  "Je suis [NOM], votre assistante personnelle. Je suis là pour vous aider avec diverses questions et tâches.",
  "Je m'appelle [NOM], une intelligence artificielle conçue pour répondre à vos questions et vous assister au quotidien.",
  "Je suis [NOM], une assistante virtuelle développée pour vous aider. Je peux répondre à vos questions sur la météo, l'heure et bien plus encore.",
];

const CREATOR: &[&str] = &[
  "J'ai été conçue et programmée par Cindy Singer, une passionnée de Digital Factory. Elle a mis tout son savoir-faire pour me doter de mes capacités et de ma personnalité.",
  "Ma créatrice est Cindy Singer, une experte en intelligence artificielle travaillant chez Digital Factory. Elle développe des assistantes comme moi pour rendre la technologie plus accessible.",
  "C'est Cindy Singer qui m'a créée. Elle travaille pour Digital Factory et se passionne pour les intelligences artificielles conversationnelles.",
];

const HOW_IT_WORKS: &[&str] = &[
  "Je fonctionne grâce à un système de traitement du langage naturel. J'analyse les mots-clés, je détecte votre intention et j'accède à différentes sources d'information pour vous répondre.",
  "J'utilise des règles d'analyse de texte pour comprendre vos questions. Je repère les mots importants, j'identifie votre intention et je formule une réponse adaptée.",
  "Mon fonctionnement repose sur l'analyse de votre texte pour en extraire l'intention. J'apprends aussi de nos échanges pour mieux reconnaître vos questions au fil du temps.",
];

const JOKE: &[&str] = &[
  "Pourquoi les plongeurs plongent-ils toujours en arrière et jamais en avant ? Parce que sinon ils tombent dans le bateau !",
  "Un électron frappe à la porte d'un hôtel. Le réceptionniste lui demande : 'Vous désirez une chambre ?' Et l'électron répond : 'Non merci, je suis déjà excité.'",
  "Qu'est-ce qu'un crocodile qui surveille la pharmacie ? Un Lacoste garde.",
  "Pourquoi les informaticiens confondent-ils Halloween et Noël ? Parce qu'Oct 31 = Dec 25.",
  "Que dit un informaticien quand il s'ennuie ? Je bit ma vie !",
  "Pourquoi les développeurs n'aiment pas la nature ? Parce qu'elle a trop de bugs.",
  "Comment un informaticien ouvre-t-il une bouteille ? Il la débogue.",
  "J'ai une blague sur les algorithmes de tri mais elle n'est pas encore ordonnée.",
  "Qu'est-ce qui est jaune et qui attend ? Jonathan.",
  "Quel est l'animal le plus connecté ? Le porc USB.",
  "Qu'est-ce qui est petit, carré et jaune ? Un petit carré jaune.",
  "Qu'est-ce qu'un canif ? Un petit fien.",
  "Comment appelle-t-on un chat tombé dans un pot de peinture le jour de Noël ? Un chat-peint de Noël.",
  "Quand un crocodile voit une femelle, que dit-il ? Oh, c'est crocmignon !",
  "Pourquoi les oiseaux volent-ils vers le sud en hiver ? Parce que c'est trop loin d'y aller à pied.",
  "Un œuf attend devant un passage piéton. Un autre œuf lui demande : 'Tu traverses pas ?' Et le premier répond : 'Non, j'ai pas envie d'être brouillé avec le conducteur !'",
  "Qu'est-ce qu'un yaourt dans la forêt ? Un yaourt nature.",
  "Qu'est-ce qui est vert et qui monte et qui descend ? Un petit pois dans un ascenseur.",
  "Comment appelle-t-on un boomerang qui ne revient pas ? Un bâton.",
  "Que fait une fraise sur un cheval ? Elle galope !",
  "Quel est le comble pour un électricien ? De ne pas être au courant.",
  "C'est l'histoire d'un papier qui tombe à l'eau. Il crie : 'Au secours ! Je ne sais pas nager !' Heureusement, une feuille morte passait par là.",
];

const ORGANIZATION: &[&str] = &[
  "Digital Factory est une entreprise innovante spécialisée dans le développement d'agents conversationnels et d'intelligences artificielles.",
  "Digital Factory est une start-up technologique qui développe des assistantes comme moi, personnalisables pour différents secteurs d'activité.",
  "Digital Factory est l'entreprise qui m'a créée. Elle conçoit des agents conversationnels destinés à assister les utilisateurs au quotidien.",
];

const UNKNOWN: &[&str] = &[
  "Je ne suis pas sûre de comprendre votre demande. Pouvez-vous reformuler ?",
  "Désolée, je n'ai pas bien saisi. Pouvez-vous préciser votre question ?",
  "Je ne comprends pas complètement. Essayez de poser votre question différemment.",
  "Je vois le nombre [NOMBRE], mais je ne sais pas quoi en faire. Pouvez-vous reformuler ?",
];

/// Fixed suggestions for anything not understood.
pub const GENERIC_SUGGESTIONS: [&str; 4] = [
  "Quelle est la météo à Paris ?",
  "Quelle heure est-il ?",
  "Raconte-moi une blague",
  "Comment vas-tu ?",
];

const SUGGESTIONS_PER_REPLY: usize = 3;

pub fn templates(intent: Intent) -> &'static [&'static str] {
  match intent {
    Intent::Greeting => GREETING,
    Intent::Farewell => FAREWELL,
    Intent::Weather => WEATHER,
    Intent::Time => TIME,
    Intent::Date => DATE,
    Intent::Thanks => THANKS,
    Intent::WellbeingQuestion => WELLBEING_QUESTION,
    Intent::WellbeingAnswer => WELLBEING_ANSWER,
    Intent::Help => HELP,
    Intent::Capabilities => CAPABILITIES,
    Intent::Identity => IDENTITY,
    Intent::Creator => CREATOR,
    Intent::HowItWorks => HOW_IT_WORKS,
    Intent::Joke => JOKE,
    Intent::Organization => ORGANIZATION,
    Intent::Unknown => UNKNOWN,
  }
}

pub fn suggestion_pool(intent: Intent) -> &'static [&'static str] {
  match intent {
    Intent::Greeting | Intent::WellbeingQuestion => {
      &["Quelle est la météo aujourd'hui ?", "Quelle heure est-il ?", "Raconte-moi une blague", "Quel jour sommes-nous ?"]
    }
    Intent::Farewell => &["Bonjour !", "Qui es-tu ?", "Raconte-moi une blague", "Quelle heure est-il ?"],
    Intent::Weather => {
      &["Quelle heure est-il ?", "Raconte-moi une blague", "Qui es-tu ?", "Quel jour sommes-nous ?", "Comment vas-tu ?"]
    }
    Intent::Time => &["Quelle est la date aujourd'hui ?", "Quel temps fait-il à Paris ?", "Raconte-moi une blague", "Comment vas-tu ?"],
    Intent::Date => &["Quelle heure est-il ?", "Raconte-moi une blague", "Qui es-tu ?", "Comment vas-tu ?"],
    Intent::Thanks => &["Puis-je te poser une autre question ?", "J'aurais besoin d'autre chose", "Quelle heure est-il ?", "Raconte-moi une blague"],
    Intent::WellbeingAnswer => &["Quelle heure est-il ?", "Quel temps fait-il à Paris ?", "Raconte-moi une blague", "Qui t'a créée ?"],
    Intent::Help => &["Quelle est la météo à Paris ?", "Quelle heure est-il ?", "Raconte-moi une blague", "Comment vas-tu ?"],
    Intent::Capabilities => &["Donne-moi la météo pour Paris", "Quelle heure est-il ?", "Raconte-moi une blague", "Quel jour sommes-nous ?"],
    Intent::Identity => &["Quelles sont tes capacités ?", "Quelle est la météo aujourd'hui ?", "Raconte-moi une blague", "Quelle heure est-il ?"],
    Intent::Creator => &["C'est quoi Digital Factory ?", "Quelles sont tes capacités ?", "Comment fonctionnes-tu ?", "Raconte-moi une blague"],
    Intent::HowItWorks => &["Qui t'a créée ?", "Quelles sont tes capacités ?", "Raconte-moi une blague", "C'est quoi Digital Factory ?"],
    Intent::Joke => &["Raconte-moi une autre blague", "Quelle heure est-il ?", "Quelle est la météo aujourd'hui ?", "Comment vas-tu ?"],
    Intent::Organization => &["Qui t'a créée ?", "Quelles sont tes capacités ?", "Comment fonctionnes-tu ?", "Raconte-moi une blague"],
    Intent::Unknown => &GENERIC_SUGGESTIONS,
  }
}

/// Values available to placeholders for one reply.
pub struct ReplyContext<'a> {
  pub entities: &'a EntityMap,
  pub now: DateTime<Local>,
  /// Rendered weather report (or apology) for weather questions
  pub weather: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ResponseSynthesizer {
  agent_name: String,
}

impl ResponseSynthesizer {
  pub fn new(agent_name: impl Into<String>) -> Self {
    Self { agent_name: agent_name.into() }
  }

  /// Fill every placeholder, or `None` if one has no value.
  pub fn render(&self, template: &str, ctx: &ReplyContext<'_>) -> Option<String> {
    let mut text = template.to_string();
    let fills: [(&str, Option<String>); 5] = [
      ("[NOM]", Some(self.agent_name.clone())),
      ("[VILLE]", ctx.entities.place().map(str::to_string)),
      ("[NOMBRE]", ctx.entities.number().map(str::to_string)),
      ("[HEURE]", Some(calendar::clock(&ctx.now))),
      ("[DATE]", Some(calendar::long_date(&ctx.now))),
    ];
    for (placeholder, value) in fills {
      if text.contains(placeholder) {
        text = text.replace(placeholder, value.as_deref()?);
      }
    }
    Some(text)
  }

  pub fn reply(&self, intent: Intent, ctx: &ReplyContext<'_>) -> String {
    if let (Intent::Weather, Some(report)) = (intent, &ctx.weather) {
      return report.clone();
    }

    let rendered: Vec<String> = templates(intent).iter().filter_map(|t| self.render(t, ctx)).collect();
    rendered.choose(&mut rand::thread_rng()).cloned().unwrap_or_else(|| UNKNOWN[0].to_string())
  }

  pub fn suggestions(&self, intent: Intent) -> Vec<String> {
    if intent.is_unknown() {
      return GENERIC_SUGGESTIONS.iter().map(|s| s.to_string()).collect();
    }
    suggestion_pool(intent)
      .choose_multiple(&mut rand::thread_rng(), SUGGESTIONS_PER_REPLY)
      .map(|s| s.to_string())
      .collect()
  }

  pub fn synthesize(&self, intent: Intent, ctx: &ReplyContext<'_>) -> (String, Vec<String>) {
    (self.reply(intent, ctx), self.suggestions(intent))
  }
}
