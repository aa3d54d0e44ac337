//! 提示词模板
//!
//! 每个周期渲染一次：嵌入本周期的检测数、机器人描述、受限函数
//! 清单和目标自然语言。函数清单必须与 [`crate::parser`] 认可的
//! 调用集保持一致——模板教模型写什么，解析器就只认什么。

/// 机器人描述
pub const ROBOT_DESCRIPTION: &str = "This is a robotic arm with 6 degrees of freedom \
that has a suction pump attached to its end effector.";

/// 受限函数清单
const ROBOT_FUNCTIONS: &str = "\
* grab(): Turns on the suction pump to grab an object
* release(): Turns off the suction pump to release an object
* move_to_object(object_no): Given a number of an object, it moves the suction pump to a given position of the object No.
* move_to_place(place_name): Given a name of a place, it moves the suction pump to a given position of the place.
    The places defines the following:
    * 'home': The initial position of the robot
    * 'drop': The position where the user receives the object
";

/// 渲染完整提示词
///
/// `utterance` 是操作员的指令文本（可能已拼接会话历史）。
pub fn render_prompt(num_objects: usize, language: &str, utterance: &str) -> String {
    format!(
        "Imagine we are working with a manipulator robot.\n\
         {ROBOT_DESCRIPTION}\n\
         I would like you to assist me in sending commands to this robot given a scene and a task. \
         There are {num_objects} objects in the image.\n\
         At any point, you have access to the following functions:\n\
         You are allowed to create new functions using these, but you are not allowed to use any \
         other hypothetical functions.\n\
         {ROBOT_FUNCTIONS}\
         Keep the solutions simple and clear. \
         You can also ask clarification questions using the tag 'Question - '. Here is an example \
         scenario that illustrates how you can ask clarification questions.\n\
         Let's assume a scene contains two spheres.\n\n\
         Me: pick up the sphere.\n\
         You: Question - there are two spheres. Which one do you want me to pick up?\n\
         Me: Sphere 1, please.\n\n\
         Use python code to express your solution or output questions in {language}.\n\n\
         Let's start!\n\n\
         {utterance}\n\
         You: "
    )
}
